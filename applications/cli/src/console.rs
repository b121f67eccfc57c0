//! Terminal presenter
//!
//! Prints the whole status display after every render. Disabled controls are
//! shown in parentheses, enabled ones in brackets with the token to type.

use async_trait::async_trait;
use encore_session::{
    control_rows, DisplayHandle, DisplayUpdate, Presenter, PresenterError, RenderRequest,
    SessionId, StatusField, INITIAL_DESCRIPTION, INITIAL_TITLE,
};
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct Screen {
    title: String,
    description: String,
    fields: Vec<StatusField>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            title: INITIAL_TITLE.to_string(),
            description: INITIAL_DESCRIPTION.to_string(),
            fields: Vec::new(),
        }
    }
}

struct ConsoleState {
    out: Box<dyn Write + Send>,
    screens: HashMap<DisplayHandle, Screen>,
}

/// Presenter that writes status displays to a terminal (or any writer)
pub struct ConsolePresenter {
    state: Mutex<ConsoleState>,
}

impl ConsolePresenter {
    /// Presenter printing to standard output
    pub fn stdout() -> Self {
        Self::with_writer(Box::new(std::io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                out,
                screens: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConsoleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Plain-text rendering of one display
pub fn format_screen(
    title: &str,
    description: &str,
    fields: &[StatusField],
    request: &RenderRequest,
) -> String {
    let mut text = format!("== {title} ==\n{description}\n");
    for field in fields {
        text.push_str(&format!("  {}: {}\n", field.name, field.value));
    }

    if let Some(snapshot) = &request.controls {
        for row in control_rows(snapshot) {
            let buttons: Vec<String> = row
                .iter()
                .map(|b| {
                    if b.disabled {
                        format!("({} {})", b.label, b.id)
                    } else {
                        format!("[{} {}]", b.label, b.id)
                    }
                })
                .collect();
            text.push_str(&buttons.join(" "));
            text.push('\n');
        }
    }
    text
}

#[async_trait]
impl Presenter for ConsolePresenter {
    async fn open(&self, session: &SessionId) -> Result<DisplayHandle, PresenterError> {
        let handle = DisplayHandle::new(format!("console-{session}"));
        let mut state = self.lock();
        state.screens.insert(handle.clone(), Screen::default());

        let text = format_screen(INITIAL_TITLE, INITIAL_DESCRIPTION, &[], &RenderRequest::new());
        state
            .out
            .write_all(text.as_bytes())
            .map_err(|e| PresenterError::Transport(e.to_string()))?;
        Ok(handle)
    }

    async fn render(
        &self,
        display: &DisplayHandle,
        request: RenderRequest,
    ) -> Result<DisplayHandle, PresenterError> {
        let mut state = self.lock();
        let mut screen = state
            .screens
            .get(display)
            .cloned()
            .ok_or_else(|| PresenterError::Gone(display.to_string()))?;

        for update in &request.updates {
            match update {
                DisplayUpdate::SetTitle(title) => screen.title.clone_from(title),
                DisplayUpdate::SetDescription(text) => screen.description.clone_from(text),
                DisplayUpdate::SetFields(fields) => screen.fields.clone_from(fields),
            }
        }

        let text = format_screen(&screen.title, &screen.description, &screen.fields, &request);
        state.screens.insert(display.clone(), screen);
        writeln!(state.out, "{text}")
            .and_then(|()| state.out.flush())
            .map_err(|e| PresenterError::Transport(e.to_string()))?;
        Ok(display.clone())
    }

    async fn delete(&self, display: &DisplayHandle) -> Result<(), PresenterError> {
        let mut state = self.lock();
        if state.screens.remove(display).is_none() {
            return Err(PresenterError::Gone(display.to_string()));
        }
        writeln!(state.out, "(display closed)").map_err(|e| PresenterError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_session::EnablementSnapshot;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn screen_lists_fields_and_controls() {
        let request = RenderRequest::new().controls(EnablementSnapshot {
            disable_prev: true,
            ..EnablementSnapshot::default()
        });
        let text = format_screen(
            "Playlist focus",
            "Now playing.",
            &[StatusField::new("Position", "1/2")],
            &request,
        );

        assert!(text.starts_with("== Playlist focus ==\nNow playing.\n"));
        assert!(text.contains("  Position: 1/2\n"));
        assert!(text.contains("(⏮ prev) [⏭ next] [⏸ pause] [⏹ stop] [… more]"));
        assert!(!text.contains("volumeUp"));
    }

    #[tokio::test]
    async fn render_keeps_text_not_replaced() {
        let buffer = SharedBuffer::default();
        let presenter = ConsolePresenter::with_writer(Box::new(buffer.clone()));
        let display = presenter.open(&SessionId::new("s1")).await.unwrap();

        presenter
            .render(
                &display,
                RenderRequest::new()
                    .title("Playlist focus")
                    .description("Now playing."),
            )
            .await
            .unwrap();
        presenter
            .render(
                &display,
                RenderRequest::new().controls(EnablementSnapshot {
                    is_expanded: true,
                    ..EnablementSnapshot::default()
                }),
            )
            .await
            .unwrap();

        let output = buffer.text();
        let last = output.rsplit("== ").next().unwrap();
        assert!(last.starts_with("Playlist focus ==\nNow playing.\n"));
        assert!(last.contains("[🔊 volumeUp]"));
    }

    #[tokio::test]
    async fn deleted_display_is_gone() {
        let presenter = ConsolePresenter::with_writer(Box::new(SharedBuffer::default()));
        let display = presenter.open(&SessionId::new("s1")).await.unwrap();

        presenter.delete(&display).await.unwrap();
        assert!(matches!(
            presenter.render(&display, RenderRequest::new()).await,
            Err(PresenterError::Gone(_))
        ));
    }
}

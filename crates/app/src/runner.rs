//! Message loop: JSON lines in, JSON lines out
//!
//! Everything runs on one thread. Slow work (rescales, decodes and
//! suggestion requests) is spawned onto the local set and reports back over
//! a channel, so the pad itself is only ever touched from this loop.

use anyhow::Result;
use doodle_ipc::{PadToUi, encode_message, parse_ui_message};
use doodle_suggest::{ColorSuggester, SuggestError};
use painting::{CodecError, SurfaceError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::clipboard::Clipboard;
use crate::pad::{Completion, DoodlePad, Outcome, PadTask};
use crate::store::DrawingStore;

/// Drive `pad` until the input closes and all work has landed, or until a
/// `Shutdown` message arrives
pub async fn run<S, C, G, R, W>(
    mut pad: DoodlePad<S, C>,
    suggester: Option<G>,
    input: R,
    mut output: W,
) -> Result<()>
where
    S: DrawingStore,
    C: Clipboard,
    G: ColorSuggester + Clone + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let mut lines = input.lines();
    let mut input_open = true;
    let mut in_flight = 0usize;

    write_messages(&mut output, &[pad.initialize()]).await?;
    info!("Doodle pad ready");

    while input_open || in_flight > 0 {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    debug!("Input closed with {} task(s) in flight", in_flight);
                    input_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let outcome = match parse_ui_message(&line) {
                    Ok(message) => pad.handle_message(message),
                    Err(e) => {
                        warn!("Rejected message: {}", e);
                        Outcome {
                            messages: vec![PadToUi::Error {
                                code: "invalid_message".to_string(),
                                message: e.to_string(),
                            }],
                            ..Default::default()
                        }
                    }
                };
                let shutdown = outcome.shutdown;
                in_flight += dispatch(outcome, suggester.as_ref(), &tx, &mut output).await?;
                if shutdown {
                    break;
                }
            }
            Some(completion) = rx.recv(), if in_flight > 0 => {
                in_flight -= 1;
                let outcome = pad.handle_completion(completion);
                in_flight += dispatch(outcome, suggester.as_ref(), &tx, &mut output).await?;
            }
        }
    }

    output.flush().await?;
    info!("Doodle pad stopped");
    Ok(())
}

/// Write the outcome's messages and spawn its tasks; returns the number spawned
async fn dispatch<G, W>(
    outcome: Outcome,
    suggester: Option<&G>,
    tx: &mpsc::UnboundedSender<Completion>,
    output: &mut W,
) -> Result<usize>
where
    G: ColorSuggester + Clone + 'static,
    W: AsyncWrite + Unpin,
{
    write_messages(output, &outcome.messages).await?;

    let spawned = outcome.tasks.len();
    for task in outcome.tasks {
        spawn_task(task, suggester.cloned(), tx.clone());
    }
    Ok(spawned)
}

fn spawn_task<G>(task: PadTask, suggester: Option<G>, tx: mpsc::UnboundedSender<Completion>)
where
    G: ColorSuggester + 'static,
{
    let guard = CompletionGuard {
        fallback: Some(failed_completion(&task)),
        tx,
    };

    tokio::task::spawn_local(async move {
        let completion = match task {
            PadTask::Redraw(job) => Completion::Redrawn {
                generation: job.generation(),
                result: job.run().await,
            },
            PadTask::Decode { origin, job } => Completion::Decoded {
                origin,
                result: job.decode().await,
            },
            PadTask::Suggest { drawing_data_uri } => {
                let result = match suggester {
                    Some(suggester) => suggester.suggest(drawing_data_uri).await,
                    None => Err(SuggestError::NotConfigured),
                };
                Completion::Suggested(result)
            }
        };
        guard.finish(completion);
    });
}

/// What a task reports if it dies before producing a result
fn failed_completion(task: &PadTask) -> Completion {
    const STOPPED: &str = "background task stopped";
    match task {
        PadTask::Redraw(job) => Completion::Redrawn {
            generation: job.generation(),
            result: Err(CodecError::Task(STOPPED.to_string())),
        },
        PadTask::Decode { origin, .. } => Completion::Decoded {
            origin: *origin,
            result: Err(SurfaceError::Decode(CodecError::Task(STOPPED.to_string()))),
        },
        PadTask::Suggest { .. } => {
            Completion::Suggested(Err(SuggestError::Connection(STOPPED.to_string())))
        }
    }
}

/// Sends exactly one completion per task, even if the task panics
struct CompletionGuard {
    tx: mpsc::UnboundedSender<Completion>,
    fallback: Option<Completion>,
}

impl CompletionGuard {
    fn finish(mut self, completion: Completion) {
        self.fallback = None;
        // The loop only stops receiving once it is shutting down
        let _ = self.tx.send(completion);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(fallback) = self.fallback.take() {
            warn!("Background task ended without a result");
            let _ = self.tx.send(fallback);
        }
    }
}

async fn write_messages<W: AsyncWrite + Unpin>(output: &mut W, messages: &[PadToUi]) -> Result<()> {
    if messages.is_empty() {
        return Ok(());
    }
    for message in messages {
        let mut line = encode_message(message)?;
        line.push('\n');
        output.write_all(line.as_bytes()).await?;
    }
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;
    use crate::store::MemoryStore;
    use doodle_ipc::{CanvasBounds, MouseEventKind, PointerEvent, UiToPad};

    struct NoClipboard;

    impl Clipboard for NoClipboard {
        fn write_png(&mut self, _png: &[u8]) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable("images"))
        }

        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable("text"))
        }
    }

    #[derive(Clone)]
    struct FixedSuggester(Vec<String>);

    impl ColorSuggester for FixedSuggester {
        async fn suggest(&self, drawing_data_uri: String) -> Result<Vec<String>, SuggestError> {
            assert!(drawing_data_uri.starts_with("data:image/jpeg;base64,"));
            Ok(self.0.clone())
        }
    }

    fn line(message: &UiToPad) -> String {
        format!("{}\n", serde_json::to_string(message).unwrap())
    }

    fn mounted() -> String {
        line(&UiToPad::Mounted {
            bounds: CanvasBounds {
                left: 0.0,
                top: 0.0,
                width: 32.0,
                height: 32.0,
            },
            scale: 1.0,
        })
    }

    async fn run_script(script: String, suggester: Option<FixedSuggester>) -> Vec<PadToUi> {
        let pad = DoodlePad::new(
            MemoryStore::new(),
            NoClipboard,
            std::env::temp_dir(),
            suggester.is_some(),
        );
        let mut output = Vec::new();

        tokio::task::LocalSet::new()
            .run_until(run(pad, suggester, script.as_bytes(), &mut output))
            .await
            .unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_initialize_comes_first() {
        let messages = run_script(String::new(), None).await;
        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0], PadToUi::Initialize { .. }));
    }

    #[tokio::test]
    async fn test_bad_line_reports_error_and_continues() {
        let script = format!("not json\n\n{}", mounted());
        let messages = run_script(script, None).await;

        assert!(matches!(messages[1], PadToUi::Error { .. }));
        assert!(matches!(messages[2], PadToUi::SurfaceResized(_)));
    }

    #[tokio::test]
    async fn test_draw_then_export() {
        let mut script = mounted();
        for kind in [MouseEventKind::Down, MouseEventKind::Move, MouseEventKind::Up] {
            script.push_str(&line(&UiToPad::Pointer(PointerEvent::Mouse {
                kind,
                client_x: 16.0,
                client_y: 16.0,
            })));
        }
        script.push_str(&line(&UiToPad::Export {
            mime: None,
            quality: None,
        }));

        let messages = run_script(script, None).await;

        let Some(PadToUi::Exported { data: Some(data) }) = messages.last() else {
            panic!("expected export, got {:?}", messages.last());
        };
        assert!(data.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_shutdown_stops_reading() {
        let script = format!("{}{}", line(&UiToPad::Shutdown), mounted());
        let messages = run_script(script, None).await;
        assert_eq!(messages.len(), 1);
    }

    #[tokio::test]
    async fn test_waits_for_suggestions_after_eof() {
        let script = format!("{}{}", mounted(), line(&UiToPad::GetSuggestions));
        let messages = run_script(script, Some(FixedSuggester(vec!["#AABBCC".to_string()]))).await;

        assert!(messages.iter().any(|m| matches!(m, PadToUi::SuggestionsPending)));
        assert!(messages.iter().any(|m| matches!(
            m,
            PadToUi::SuggestedColors { colors } if colors == &["#AABBCC".to_string()]
        )));
    }

    #[derive(Clone)]
    struct PanickingSuggester;

    impl ColorSuggester for PanickingSuggester {
        async fn suggest(&self, _drawing_data_uri: String) -> Result<Vec<String>, SuggestError> {
            panic!("suggester crashed");
        }
    }

    #[tokio::test]
    async fn test_panicked_task_still_completes() {
        let pad = DoodlePad::new(MemoryStore::new(), NoClipboard, std::env::temp_dir(), true);
        let script = format!("{}{}", mounted(), line(&UiToPad::GetSuggestions));
        let mut output = Vec::new();

        tokio::task::LocalSet::new()
            .run_until(run(pad, Some(PanickingSuggester), script.as_bytes(), &mut output))
            .await
            .unwrap();

        let messages: Vec<PadToUi> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert!(messages.iter().any(|m| matches!(
            m,
            PadToUi::Toast(toast) if toast.title == "AI Error"
        )));
    }

    #[tokio::test]
    async fn test_import_lands_after_eof() {
        let mut source = painting::SurfaceManager::new();
        source.resize(painting::Bounds::sized(32.0, 32.0), 1.0);
        let data = source.export(None, None).unwrap();

        let script = format!("{}{}", mounted(), line(&UiToPad::Import { data }));
        let messages = run_script(script, None).await;

        assert!(matches!(messages.last(), Some(PadToUi::RegionUpdated(_))));
    }
}

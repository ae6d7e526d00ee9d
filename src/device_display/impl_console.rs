use crate::capture_workflow::core::Event;
use crate::device_display::interface::{DeviceDisplay, Page, ScreenView};
use std::error::Error;
use std::io::BufRead;
use std::sync::mpsc::Sender;

const WIDTH: usize = 44;

pub struct DeviceDisplayConsole {}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self {}
    }

    fn lines(view: &ScreenView) -> Vec<String> {
        let mut lines = match &view.page {
            Page::Home => vec!["[t] Take Picture".to_string()],
            Page::Camera { ready, capturing } => {
                let status = if *capturing {
                    "Capturing..."
                } else if *ready {
                    "Camera ready"
                } else {
                    "Starting camera..."
                };
                vec![status.to_string(), "[s] Shutter".to_string()]
            }
            Page::Preview {
                photo_uri,
                classifying,
                result,
            } => {
                let mut lines = vec![
                    format!("Photo: {}", photo_uri.display()),
                    "[c] Classify Picture  [t] Retake".to_string(),
                ];
                if *classifying {
                    lines.push("Classifying...".to_string());
                }
                if let Some(result) = result {
                    lines.push(result.clone());
                }
                lines
            }
        };

        if let Some(alert) = &view.alert {
            lines.push(String::new());
            lines.push(format!("! {}", alert.title));
            lines.push(alert.message.clone());
            lines.push("[o] OK".to_string());
        }

        lines
    }

    fn render_display(view: &ScreenView) {
        println!("┌{}┐", "─".repeat(WIDTH));
        for line in Self::lines(view) {
            let clipped: String = line.chars().take(WIDTH).collect();
            let padding = WIDTH - clipped.chars().count();
            println!("│{}{}│", clipped, " ".repeat(padding));
        }
        println!("└{}┘", "─".repeat(WIDTH));
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn show(&mut self, view: &ScreenView) -> Result<(), Box<dyn Error + Send + Sync>> {
        Self::render_display(view);
        Ok(())
    }
}

fn parse_command(line: &str) -> Option<Event> {
    match line.trim() {
        "t" => Some(Event::StartCameraPressed),
        "s" => Some(Event::ShutterPressed),
        "c" => Some(Event::ClassifyPressed),
        "o" => Some(Event::AlertDismissed),
        "q" => Some(Event::Quit),
        _ => None,
    }
}

/// Turns one-letter commands on `input` into workflow events until `q` or
/// end of input. Both end by sending `Quit`.
pub fn read_commands<R: BufRead>(
    input: R,
    event_sender: &Sender<Event>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    for line in input.lines() {
        match parse_command(&line?) {
            Some(Event::Quit) => break,
            Some(event) => event_sender.send(event)?,
            None => println!("commands: t s c o q"),
        }
    }
    event_sender.send(Event::Quit)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device_display::interface::AlertView;
    use std::io::Cursor;
    use std::sync::mpsc::channel;

    #[test]
    fn test_commands_become_events() {
        let (sender, receiver) = channel();

        read_commands(Cursor::new("t\ns\nbogus\nc\no\nq\nt\n"), &sender).unwrap();

        let events: Vec<String> = receiver.try_iter().map(|e| format!("{:?}", e)).collect();
        assert_eq!(
            events,
            vec![
                "StartCameraPressed",
                "ShutterPressed",
                "ClassifyPressed",
                "AlertDismissed",
                "Quit"
            ]
        );
    }

    #[test]
    fn test_end_of_input_quits() {
        let (sender, receiver) = channel();

        read_commands(Cursor::new(""), &sender).unwrap();

        assert!(matches!(receiver.try_recv(), Ok(Event::Quit)));
    }

    #[test]
    fn test_preview_lines_include_result_and_alert() {
        let view = ScreenView {
            page: Page::Preview {
                photo_uri: "capture.jpg".into(),
                classifying: false,
                result: Some("Class: tabby cat Probability: 0.9".to_string()),
            },
            alert: Some(AlertView {
                title: "Classification failed".to_string(),
                message: "boom".to_string(),
            }),
        };

        let lines = DeviceDisplayConsole::lines(&view);

        assert!(lines.contains(&"Class: tabby cat Probability: 0.9".to_string()));
        assert!(lines.contains(&"! Classification failed".to_string()));
    }
}

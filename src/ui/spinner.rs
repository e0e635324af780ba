use crossterm::{
    cursor::MoveToColumn,
    execute,
    style::{Print, Stylize},
    terminal::{Clear, ClearType},
};
use std::fmt::Display;
use std::future::Future;
use std::io::{stderr, IsTerminal};
use std::time::Duration;

pub const FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
const TICK: Duration = Duration::from_millis(100);

fn redraw(line: impl Display) {
    // Drawing is best effort, the command result is what matters
    execute!(
        stderr(),
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(line)
    )
    .ok();
}

/// Drive `future` to completion while animating `label` on stderr, then
/// leave a one-line outcome behind. Without a terminal only the outcome is
/// printed.
///
pub async fn spin<F, T, E>(label: &str, future: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    let interactive = stderr().is_terminal();
    let mut ticker = tokio::time::interval(TICK);
    let mut frame = 0;
    tokio::pin!(future);

    let result = loop {
        tokio::select! {
            result = &mut future => break result,
            _ = ticker.tick() => {
                if interactive {
                    redraw(format!("{} {}", FRAMES[frame % FRAMES.len()], label).dim());
                }
                frame += 1;
            }
        }
    };

    let outcome = match &result {
        Ok(_) => format!("* {} ... Done", label).green(),
        Err(e) => format!("* {} ... Failed: {}", label, e).red().bold(),
    };
    if interactive {
        redraw(format!("{}\n", outcome));
    } else {
        eprintln!("{}", outcome);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spin_returns_result() {
        let value: Result<u32, String> = spin("Loading", async {
            tokio::time::sleep(Duration::from_millis(250)).await;
            Ok(7)
        })
        .await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test]
    async fn test_spin_passes_errors_through() {
        let value: Result<(), String> = spin("Loading", async { Err("boom".to_string()) }).await;
        assert_eq!(value, Err("boom".to_string()));
    }
}

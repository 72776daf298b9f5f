use std::{borrow::Cow, io};

use owo_colors::OwoColorize;
use tokio::{task, time::Duration};

use crate::{config::LaunchConfig, startup::Application};

/// How long to wait before pointing the browser at the server. The
/// listener is already bound by then; the delay only gives actix time
/// to start accepting before the first page load.
pub const BROWSER_OPEN_DELAY: Duration = Duration::from_millis(1500);

enum ValueTone {
    Primary,
    Success,
    Warning,
    Accent,
    Muted,
}

pub fn print_startup_summary(config: &LaunchConfig, app: &Application) {
    let title = "JARDESIGNER";
    let border = "=".repeat(title.len() + 8);

    println!("{}", border.clone().bright_black());
    println!("  {}", title.cyan().bold());
    println!("{}", border.bright_black());

    let address_primary = app.primary_url();
    let address_alt = format!("http://localhost:{}", app.port());
    let bundle_dir = Cow::Owned(app.bundle_dir().display().to_string());
    let debug = if app.debug() {
        Cow::Borrowed("ENABLED")
    } else {
        Cow::Borrowed("disabled")
    };
    let browser = if config.no_browser {
        Cow::Borrowed("Manual (--no-browser)")
    } else {
        Cow::Borrowed("Auto-open on start")
    };

    let rows: Vec<(&str, Cow<'_, str>, ValueTone)> = vec![
        ("Address", Cow::Owned(address_primary), ValueTone::Primary),
        ("Alt", Cow::Owned(address_alt), ValueTone::Muted),
        ("Bundle", bundle_dir, ValueTone::Accent),
        (
            "Debug",
            debug,
            if app.debug() {
                ValueTone::Warning
            } else {
                ValueTone::Muted
            },
        ),
        ("Browser", browser, ValueTone::Accent),
        (
            "Exit",
            Cow::Borrowed("Press Ctrl+C to stop"),
            ValueTone::Success,
        ),
    ];

    let label_width = rows
        .iter()
        .map(|(label, _, _)| label.len())
        .max()
        .unwrap_or(0)
        + 1;

    for (label, value, tone) in rows {
        let padded_label = format!("{label:<label_width$}:", label_width = label_width);
        let colored_label = format!("{}", padded_label.bright_blue().bold());
        let colored_value = colorize(value.as_ref(), tone);

        println!("  {} {}", colored_label, colored_value);
    }

    println!();
    if config.no_browser {
        println!(
            "  {}",
            "Browser launch disabled (--no-browser). Open the address above yourself."
                .bright_black()
                .italic()
        );
    } else {
        println!(
            "  {}",
            "Copy the address above if your browser did not open automatically."
                .bright_black()
                .italic()
        );
    }
    println!(
        "  {}",
        "Leave this terminal open to keep JARDesigner running."
            .bright_black()
            .italic()
    );
    println!();
}

fn colorize(value: &str, tone: ValueTone) -> String {
    match tone {
        ValueTone::Primary => value.bold().bright_white().to_string(),
        ValueTone::Success => value.bold().bright_green().to_string(),
        ValueTone::Warning => value.to_string().bright_yellow().to_string(),
        ValueTone::Accent => value.to_string().bright_cyan().to_string(),
        ValueTone::Muted => value.to_string().dimmed().to_string(),
    }
}

/// Fire-and-forget browser open. Runs after a fixed delay, off the
/// serving path, and is never cancelled; a failure downgrades to a
/// warning with manual instructions.
pub fn launch_browser(url: String) {
    let _ = launch_browser_with(url, |target| open::that(target));
}

/// Same, with the browser-open primitive passed in. The opener runs at
/// most once, on the blocking pool, and its failure never escapes the
/// spawned task.
pub fn launch_browser_with<F>(url: String, opener: F) -> task::JoinHandle<()>
where
    F: FnOnce(&str) -> io::Result<()> + Send + 'static,
{
    task::spawn(async move {
        tokio::time::sleep(BROWSER_OPEN_DELAY).await;

        let target = url.clone();
        match task::spawn_blocking(move || opener(&target)).await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                eprintln!(
                    "[jardesigner] could not open your browser: {error}. Open {url} manually."
                );
            }
            Err(error) => {
                eprintln!(
                    "[jardesigner] browser task join error: {error}. Open {url} manually."
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn opener_receives_the_exact_url_once() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&calls);

        launch_browser_with("http://127.0.0.1:5000".into(), move |url| {
            recorded.lock().unwrap().push(url.to_string());
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["http://127.0.0.1:5000".to_string()]
        );
    }

    #[tokio::test]
    async fn failing_opener_stays_a_warning() {
        let handle = launch_browser_with("http://127.0.0.1:5000".into(), |_| {
            Err(io::Error::other("no display"))
        });

        // The task finishes cleanly; the caller never sees the failure.
        handle.await.unwrap();
    }
}

//! Colorful console output for optimizer runs.
//!
//! Provides a `tracing` layer that renders the optimizer's structured
//! events (`event = "..."` fields) as colored log lines.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect.
/// `RUST_LOG` overrides the default `buildforge_solver=info` filter.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("buildforge_solver=info"));

        // Another subscriber may already be installed by the host program
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(OptimizerConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let banner = r#"
 ____        _ _     _ _____
| __ ) _   _(_) | __| |  ___|__  _ __ __ _  ___
|  _ \| | | | | |/ _` | |_ / _ \| '__/ _` |/ _ \
| |_) | |_| | | | (_| |  _| (_) | | | (_| |  __/
|____/ \__,_|_|_|\__,_|_|  \___/|_|  \__, |\___|
                                     |___/
"#;

    let version_line = format!(
        "                 v{} - Exhaustive Build Optimizer\n",
        env!("CARGO_PKG_VERSION")
    );

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats optimizer events with colors.
pub struct OptimizerConsoleLayer;

impl<S: Subscriber> Layer<S> for OptimizerConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("buildforge_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    direction: Option<String>,
    tier: Option<String>,
    slot_count: Option<u64>,
    candidate_count: Option<u64>,
    total_combinations: Option<u64>,
    combinations: Option<u64>,
    max_results: Option<u64>,
    processed: Option<u64>,
    evaluated: Option<u64>,
    build_count: Option<u64>,
    duration_ms: Option<u64>,
    best_value: Option<f64>,
    terminated_early: bool,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "direction" => self.direction = Some(s),
            "tier" => self.tier = Some(s),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "direction" => self.direction = Some(value.to_string()),
            "tier" => self.tier = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "slot_count" => self.slot_count = Some(value),
            "candidate_count" => self.candidate_count = Some(value),
            "total_combinations" => self.total_combinations = Some(value),
            "combinations" => self.combinations = Some(value),
            "max_results" => self.max_results = Some(value),
            "processed" => self.processed = Some(value),
            "evaluated" => self.evaluated = Some(value),
            "build_count" => self.build_count = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "best_value" {
            self.best_value = Some(value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "terminated_early" {
            self.terminated_early = value;
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "optimize_start" => format_start(v),
        "prune" => format_prune(v),
        "terminated_early" => format_terminated(v),
        "objective_unresolved" => format!(
            "{} {} {} objective could not be resolved, no builds searched",
            timestamp().bright_black(),
            "WARN".bright_yellow(),
            "[Optimizer]".bright_cyan(),
        ),
        "optimize_end" => format_end(v),
        _ => String::new(),
    }
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} slots ({}), candidates ({}), combinations ({}), direction ({}), keeping best ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Optimizer]".bright_cyan(),
        count(v.slot_count).bright_yellow(),
        count(v.candidate_count).bright_yellow(),
        count(v.total_combinations).bright_magenta(),
        v.direction.as_deref().unwrap_or("Descending").white(),
        count(v.max_results).bright_yellow(),
    )
}

fn format_prune(v: &EventVisitor) -> String {
    format!(
        "{} {} {} {} tier: candidates ({}), combinations ({})",
        timestamp().bright_black(),
        "DEBUG".bright_blue(),
        "[Pruning]".bright_cyan(),
        v.tier.as_deref().unwrap_or("Unknown").white().bold(),
        count(v.candidate_count).yellow(),
        count(v.combinations).yellow(),
    )
}

fn format_terminated(v: &EventVisitor) -> String {
    format!(
        "{} {} {} search stopped early after ({}) combinations",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Optimizer]".bright_cyan(),
        count(v.processed).bright_yellow(),
    )
}

fn format_end(v: &EventVisitor) -> String {
    let best = v
        .best_value
        .map(|value| format!("{:.2}", value))
        .unwrap_or_else(|| "N/A".to_string());
    let status = if v.terminated_early {
        "partial".bright_yellow().to_string()
    } else {
        "exhaustive".bright_green().to_string()
    };

    format!(
        "{} {} {} Search ended ({}): time spent ({}), combinations ({}), evaluated ({}), builds ({}), best value ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Optimizer]".bright_cyan(),
        status,
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        count(v.processed).white(),
        count(v.evaluated).white(),
        count(v.build_count).bright_yellow(),
        best.bright_magenta().bold(),
    )
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn unknown_events_are_silent() {
        let visitor = EventVisitor {
            event: Some("compaction".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&visitor).is_empty());
    }

    #[test]
    fn end_event_mentions_counts() {
        let visitor = EventVisitor {
            event: Some("optimize_end".to_string()),
            processed: Some(12_345),
            build_count: Some(3),
            best_value: Some(42.0),
            ..EventVisitor::default()
        };
        let line = format_event(&visitor);
        assert!(line.contains("12,345"));
        assert!(line.contains("42.00"));
    }
}

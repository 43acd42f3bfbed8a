use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::filter::IndicatifFilter;
use tracing_indicatif::span_ext::IndicatifSpanExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::terminal::logging::ReachrFormatter;

const DEFAULT_FILTER: &str = "info";
const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

/// Installs the global subscriber.
///
/// Log lines are routed through the indicatif writer so they never tear a
/// running spinner. Only spans carrying `indicatif.pb_show` get a spinner.
pub fn init_logging() {
    let indicatif_layer = IndicatifLayer::new();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .event_format(ReachrFormatter)
        .with_writer(indicatif_layer.get_stdout_writer());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(indicatif_layer.with_filter(IndicatifFilter::new(false)))
        .init();
}

/// Applies the spinner style to a span created with `indicatif.pb_show`.
pub fn style_span(span: &Span, msg: &str) {
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        span.pb_set_style(&style.tick_strings(TICK_STRINGS));
    }
    span.pb_set_message(msg);
}

pub fn report_progress(span: &Span, msg: &str) {
    span.pb_set_message(msg);
}

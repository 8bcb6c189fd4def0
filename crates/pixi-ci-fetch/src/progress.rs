use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

const BAR_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const BAR_CHARS: &str = "█▓▒░  ";

static BAR_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| {
    ProgressStyle::with_template(BAR_STYLE)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(BAR_CHARS))
});

/// Byte progress for one artifact download.
pub(crate) struct DownloadProgress {
    bar: ProgressBar,
}

impl DownloadProgress {
    /// A bar is only shown when the server reported a length.
    pub(crate) fn start(total: Option<u64>, label: &str, enabled: bool) -> Option<Self> {
        let total = total.filter(|_| enabled)?;
        let bar = ProgressBar::new(total);
        let bar = match BAR_TEMPLATE.as_ref() {
            Some(style) => bar.with_style(style.clone()),
            None => bar,
        };
        bar.set_prefix(label.to_string());
        Some(Self { bar })
    }

    pub(crate) fn step(&self, len: u64) {
        self.bar.inc(len);
    }

    pub(crate) fn finish(self) {
        self.bar.finish_and_clear();
    }
}

//! Where deprecation notices go, and how their templates get localized.

use crate::deprecated::DeprecationNotice;
use crate::releases::Release;
use std::borrow::Cow;
use std::sync::{Arc, OnceLock};
use tracing::Level;

/// Log target used by [`TracingSink`].
pub const LOG_TARGET: &str = "release_deprecation";

/// Destination for deprecation notices.
///
/// `emit` runs on every call of a deprecated target. It must not block and
/// must not panic; it has no way to affect the call it reports on.
pub trait NoticeSink: Send + Sync {
    fn emit(&self, notice: &DeprecationNotice);
}

impl<F> NoticeSink for F
where
    F: Fn(&DeprecationNotice) + Send + Sync,
{
    fn emit(&self, notice: &DeprecationNotice) {
        self(notice)
    }
}

/// Sends notices to `tracing` under [`LOG_TARGET`].
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    level: Level,
}

impl TracingSink {
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(Level::WARN)
    }
}

macro_rules! emit_at {
    ($level:expr, $notice:ident) => {
        tracing::event!(
            target: LOG_TARGET,
            $level,
            what = %$notice.what,
            as_of = %$notice.as_of,
            remove_in = $notice.remove_in.map(Release::name).unwrap_or("never"),
            in_favor_of = $notice.in_favor_of.as_deref().unwrap_or(""),
            "{}",
            $notice.message
        )
    };
}

impl NoticeSink for TracingSink {
    fn emit(&self, notice: &DeprecationNotice) {
        match self.level {
            Level::ERROR => emit_at!(Level::ERROR, notice),
            Level::WARN => emit_at!(Level::WARN, notice),
            Level::INFO => emit_at!(Level::INFO, notice),
            Level::DEBUG => emit_at!(Level::DEBUG, notice),
            _ => emit_at!(Level::TRACE, notice),
        }
    }
}

/// The process-wide default sink: a [`TracingSink`] at WARN, created once.
pub fn default_sink() -> Arc<dyn NoticeSink> {
    static DEFAULT: OnceLock<Arc<dyn NoticeSink>> = OnceLock::new();
    DEFAULT
        .get_or_init(|| Arc::new(TracingSink::default()))
        .clone()
}

/// Localization hook applied to message templates before interpolation.
///
/// Placeholders (`{what}`, `{as_of}`, `{in_favor_of}`, `{remove_in}`) must
/// survive translation.
pub trait Translate: Send + Sync {
    fn translate<'a>(&self, template: &'a str) -> Cow<'a, str>;
}

/// Leaves templates as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct Untranslated;

impl Translate for Untranslated {
    fn translate<'a>(&self, template: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(template)
    }
}

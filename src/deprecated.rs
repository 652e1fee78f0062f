//! Deprecation markers.
//!
//! A [`Marker`] carries the release a target was deprecated in, an optional
//! replacement and how many releases to wait before removal. Applying it to a
//! function or constructor yields a [`Deprecated`] wrapper that reports a
//! notice on every call and then delegates to the original.
//!
//! # Example
//!
//! ```
//! use release_deprecation::{releases, Function, Marker};
//!
//! let b = Marker::new(releases::ICEHOUSE)
//!     .in_favor_of("f()")
//!     .apply(Function::new("b", |x: i32| x + 1))
//!     .unwrap();
//!
//! assert_eq!(
//!     b.notice().message,
//!     "b() is deprecated as of ICEHOUSE in favor of f() and may be removed in KILO."
//! );
//! assert_eq!(b.call((1,)), 2);
//! ```

use crate::error::{DeprecationError, Result};
use crate::releases::Release;
use crate::sink::{default_sink, NoticeSink, Translate, Untranslated};
use crate::target::{Constructor, Deprecatable, Function, Invoke, TargetKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Releases to wait before removal when none is given.
pub const DEFAULT_REMOVE_IN: usize = 2;

const MSG_WITH_ALTERNATIVE: &str =
    "{what} is deprecated as of {as_of} in favor of {in_favor_of} and may be removed in {remove_in}.";

const MSG_NO_ALTERNATIVE: &str =
    "{what} is deprecated as of {as_of} and may be removed in {remove_in}. It will not be superseded.";

const MSG_WITH_ALTERNATIVE_NO_REMOVAL: &str =
    "{what} is deprecated as of {as_of} in favor of {in_favor_of}.";

const MSG_NO_ALTERNATIVE_NO_REMOVAL: &str =
    "{what} is deprecated as of {as_of}. It will not be superseded.";

/// A release, or text naming one that is resolved when the marker is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseRef {
    Release(Release),
    Text(String),
}

impl ReleaseRef {
    pub fn resolve(&self) -> Result<Release> {
        match self {
            ReleaseRef::Release(release) => Ok(*release),
            ReleaseRef::Text(text) => text.parse(),
        }
    }
}

impl From<Release> for ReleaseRef {
    fn from(release: Release) -> Self {
        ReleaseRef::Release(release)
    }
}

impl From<&str> for ReleaseRef {
    fn from(text: &str) -> Self {
        ReleaseRef::Text(text.to_string())
    }
}

impl From<String> for ReleaseRef {
    fn from(text: String) -> Self {
        ReleaseRef::Text(text)
    }
}

impl fmt::Display for ReleaseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseRef::Release(release) => release.fmt(f),
            ReleaseRef::Text(text) => f.write_str(text),
        }
    }
}

/// A fully built deprecation notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeprecationNotice {
    /// Name of the deprecated thing, e.g. `b()`.
    pub what: String,
    pub as_of: Release,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_favor_of: Option<String>,
    /// Release in which removal becomes acceptable; `None` when no removal
    /// is planned.
    #[serde(default)]
    pub remove_in: Option<Release>,
    /// The formatted message.
    pub message: String,
}

impl fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Configuration for marking a target as deprecated.
#[derive(Clone)]
pub struct Marker {
    as_of: ReleaseRef,
    in_favor_of: Option<String>,
    remove_in: usize,
    what: Option<String>,
    log: Option<Arc<dyn NoticeSink>>,
    translator: Arc<dyn Translate>,
}

impl Marker {
    /// Create a marker for something deprecated as of `as_of`.
    ///
    /// Text is not resolved here; an unknown release surfaces when the
    /// marker is applied.
    pub fn new(as_of: impl Into<ReleaseRef>) -> Self {
        Self {
            as_of: as_of.into(),
            in_favor_of: None,
            remove_in: DEFAULT_REMOVE_IN,
            what: None,
            log: None,
            translator: Arc::new(Untranslated),
        }
    }

    /// Name the replacement. An empty string means no replacement.
    pub fn in_favor_of(mut self, replacement: impl Into<String>) -> Self {
        self.in_favor_of = Some(replacement.into()).filter(|s| !s.is_empty());
        self
    }

    /// Releases to wait before removal; `0` means removal is not planned.
    pub fn remove_in(mut self, releases: usize) -> Self {
        self.remove_in = releases;
        self
    }

    /// Name used in the notice instead of the target's own name.
    pub fn what(mut self, what: impl Into<String>) -> Self {
        self.what = Some(what.into()).filter(|s| !s.is_empty());
        self
    }

    /// Send notices to `sink` instead of the default sink.
    pub fn log(mut self, sink: Arc<dyn NoticeSink>) -> Self {
        self.log = Some(sink);
        self
    }

    pub fn translator(mut self, translator: Arc<dyn Translate>) -> Self {
        self.translator = translator;
        self
    }

    pub fn as_of(&self) -> &ReleaseRef {
        &self.as_of
    }

    pub fn remove_in_releases(&self) -> usize {
        self.remove_in
    }

    /// Build the notice `target` would report, without wrapping it.
    ///
    /// Fails with [`DeprecationError::InvalidTarget`] for targets that are
    /// neither functions nor constructors, and with release errors when
    /// `as_of` or the removal offset cannot be resolved.
    pub fn notice_for<T>(&self, target: &T) -> Result<DeprecationNotice>
    where
        T: Deprecatable + ?Sized,
    {
        let kind = target.kind();
        if let TargetKind::Other(_) = kind {
            return Err(DeprecationError::InvalidTarget {
                name: target.display_name().into_owned(),
                kind: kind.to_string(),
            });
        }

        let what = match &self.what {
            Some(what) => what.clone(),
            None => format!("{}()", target.display_name()),
        };
        self.build_notice(what)
    }

    fn build_notice(&self, what: String) -> Result<DeprecationNotice> {
        let as_of = self.as_of.resolve()?;
        let remove_in = as_of.offset(self.remove_in)?;
        let removal_planned = self.remove_in > 0;

        let template = match (&self.in_favor_of, removal_planned) {
            (Some(_), true) => MSG_WITH_ALTERNATIVE,
            (Some(_), false) => MSG_WITH_ALTERNATIVE_NO_REMOVAL,
            (None, true) => MSG_NO_ALTERNATIVE,
            (None, false) => MSG_NO_ALTERNATIVE_NO_REMOVAL,
        };
        let template = self.translator.translate(template);

        let message = interpolate(
            &template,
            &[
                ("what", what.as_str()),
                ("as_of", as_of.name()),
                ("in_favor_of", self.in_favor_of.as_deref().unwrap_or("")),
                ("remove_in", remove_in.name()),
            ],
        );

        Ok(DeprecationNotice {
            what,
            as_of,
            in_favor_of: self.in_favor_of.clone(),
            remove_in: removal_planned.then_some(remove_in),
            message,
        })
    }

    /// Wrap `target` so every call reports the deprecation notice.
    ///
    /// The notice is built once, here; calls only emit it.
    pub fn apply<T: Deprecatable>(&self, target: T) -> Result<Deprecated<T>> {
        let notice = self.notice_for(&target)?;
        debug!(
            what = %notice.what,
            kind = %target.kind(),
            "Target marked as deprecated"
        );

        Ok(Deprecated {
            target,
            notice: Arc::new(notice),
            sink: self.log.clone().unwrap_or_else(default_sink),
        })
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Marker")
            .field("as_of", &self.as_of)
            .field("in_favor_of", &self.in_favor_of)
            .field("remove_in", &self.remove_in)
            .field("what", &self.what)
            .field("custom_log", &self.log.is_some())
            .finish_non_exhaustive()
    }
}

/// Substitute `{name}` placeholders in one pass. Unknown placeholders are
/// left as written.
fn interpolate(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let substituted = after.find('}').and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, end))
        });

        match substituted {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// A target wrapped by a [`Marker`].
#[derive(Clone)]
pub struct Deprecated<T> {
    target: T,
    notice: Arc<DeprecationNotice>,
    sink: Arc<dyn NoticeSink>,
}

impl<T: Deprecatable> Deprecated<T> {
    /// Name of the wrapped target.
    pub fn name(&self) -> std::borrow::Cow<'_, str> {
        self.target.display_name()
    }

    /// Documentation of the wrapped target.
    pub fn doc(&self) -> Option<&str> {
        self.target.doc()
    }
}

impl<T> Deprecated<T> {
    pub fn notice(&self) -> &DeprecationNotice {
        &self.notice
    }

    /// Emit the notice to the configured sink.
    pub fn report(&self) {
        self.sink.emit(&self.notice);
    }

    pub fn into_inner(self) -> T {
        self.target
    }
}

impl<F> Deprecated<Function<F>> {
    /// Report the deprecation, then call the original with `args`.
    ///
    /// Arguments are passed as a tuple: `()`, `(a,)`, `(a, b)`, ...
    pub fn call<Args>(&self, args: Args) -> <F as Invoke<Args>>::Output
    where
        F: Invoke<Args>,
    {
        self.report();
        self.target.func().invoke(args)
    }
}

impl<F> Deprecated<Constructor<F>> {
    /// Report the deprecation, then build an instance.
    ///
    /// Reports once per instance. Methods on the returned value are not
    /// affected.
    pub fn construct<Args>(&self, args: Args) -> <F as Invoke<Args>>::Output
    where
        F: Invoke<Args>,
    {
        self.report();
        self.target.build().invoke(args)
    }
}

impl<T: fmt::Debug> fmt::Debug for Deprecated<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deprecated")
            .field("target", &self.target)
            .field("notice", &self.notice.message)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::releases::{ICEHOUSE, JUNO, KILO, LIBERTY};
    use crate::target::DeclaredTarget;
    use std::borrow::Cow;
    use std::sync::Mutex;

    fn collector() -> (Arc<dyn NoticeSink>, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let collected = seen.clone();
        let sink: Arc<dyn NoticeSink> =
            Arc::new(move |n: &DeprecationNotice| collected.lock().unwrap().push(n.message.clone()));
        (sink, seen)
    }

    fn noop() {}

    #[test]
    fn test_default_removal_no_replacement() {
        let (sink, seen) = collector();
        let a = Marker::new(ICEHOUSE)
            .log(sink)
            .apply(Function::new("a", noop))
            .unwrap();

        a.call(());
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["a() is deprecated as of ICEHOUSE and may be removed in KILO. It will not be superseded."]
        );
    }

    #[test]
    fn test_replacement_from_text_release() {
        let (sink, seen) = collector();
        let b = Marker::new("ICEHOUSE")
            .in_favor_of("f()")
            .log(sink)
            .apply(Function::new("b", noop))
            .unwrap();

        b.call(());
        assert_eq!(
            seen.lock().unwrap()[0],
            "b() is deprecated as of ICEHOUSE in favor of f() and may be removed in KILO."
        );
    }

    #[test]
    fn test_remove_in_one_release() {
        let c = Marker::new(ICEHOUSE)
            .remove_in(1)
            .apply(Function::new("c", noop))
            .unwrap();
        assert_eq!(
            c.notice().message,
            "c() is deprecated as of ICEHOUSE and may be removed in JUNO. It will not be superseded."
        );
        assert_eq!(c.notice().remove_in, Some(JUNO));
    }

    #[test]
    fn test_no_removal_no_replacement() {
        let (sink, seen) = collector();
        let d = Marker::new("icehouse")
            .remove_in(0)
            .log(sink)
            .apply(Function::new("d", noop))
            .unwrap();

        d.call(());
        assert_eq!(
            seen.lock().unwrap()[0],
            "d() is deprecated as of ICEHOUSE. It will not be superseded."
        );
        assert_eq!(d.notice().remove_in, None);
    }

    #[test]
    fn test_no_removal_with_replacement() {
        let e = Marker::new(ICEHOUSE)
            .in_favor_of("f()")
            .remove_in(0)
            .apply(Function::new("e", noop))
            .unwrap();
        assert_eq!(
            e.notice().message,
            "e() is deprecated as of ICEHOUSE in favor of f()."
        );
    }

    #[test]
    fn test_no_removal_never_mentions_removal() {
        for replacement in ["", "g()"] {
            let notice = Marker::new(JUNO)
                .in_favor_of(replacement)
                .remove_in(0)
                .notice_for(&DeclaredTarget::new("h", TargetKind::Function))
                .unwrap();
            assert!(!notice.message.contains("removed"), "{}", notice.message);
        }
    }

    #[test]
    fn test_wrapped_function_returns_original_result() {
        let (sink, seen) = collector();
        let add = Marker::new(JUNO)
            .log(sink)
            .apply(Function::new("add", |a: i32, b: i32| a + b))
            .unwrap();

        assert_eq!(add.call((2, 3)), 5);
        assert_eq!(add.call((-4, 4)), 0);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_wrapped_function_propagates_errors() {
        let parse = Marker::new(JUNO)
            .apply(Function::new("parse", |s: &str| s.parse::<u8>()))
            .unwrap();

        assert_eq!(parse.call(("7",)), Ok(7));
        assert!(parse.call(("seven",)).is_err());
    }

    #[test]
    fn test_identity_metadata_preserved() {
        let wrapped = Marker::new(ICEHOUSE)
            .apply(Function::new("legacy", noop).with_doc("Does nothing."))
            .unwrap();
        assert_eq!(wrapped.name(), "legacy");
        assert_eq!(wrapped.doc(), Some("Does nothing."));
    }

    #[derive(Debug, PartialEq)]
    struct Widget {
        size: u32,
    }

    impl Widget {
        fn area(&self) -> u32 {
            self.size * self.size
        }
    }

    #[test]
    fn test_constructor_reports_once_per_instance() {
        let (sink, seen) = collector();
        let new_widget = Marker::new(ICEHOUSE)
            .in_favor_of("Gadget")
            .log(sink)
            .apply(Constructor::of::<Widget>(|size: u32| Widget { size }))
            .unwrap();

        let first = new_widget.construct((3,));
        let second = new_widget.construct((4,));
        assert_eq!(first.area() + second.area() + first.area(), 34);
        assert_eq!(second, Widget { size: 4 });

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(
            seen[0],
            "Widget() is deprecated as of ICEHOUSE in favor of Gadget and may be removed in KILO."
        );
    }

    #[test]
    fn test_invalid_target() {
        let target = DeclaredTarget::new("VERSION", TargetKind::Other("constant".to_string()));
        let err = Marker::new(ICEHOUSE).apply(target).unwrap_err();
        assert_eq!(
            err,
            DeprecationError::InvalidTarget {
                name: "VERSION".to_string(),
                kind: "constant".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_release_deferred_to_apply() {
        let marker = Marker::new("mitaka");
        assert_eq!(marker.as_of(), &ReleaseRef::Text("mitaka".to_string()));

        let err = marker.apply(Function::new("x", noop)).unwrap_err();
        assert_eq!(
            err,
            DeprecationError::UnknownRelease {
                text: "mitaka".to_string()
            }
        );
    }

    #[test]
    fn test_out_of_range_at_apply() {
        let err = Marker::new(KILO).apply(Function::new("x", noop)).unwrap_err();
        assert_eq!(
            err,
            DeprecationError::OutOfRange {
                release: KILO,
                delta: 2
            }
        );

        let notice = Marker::new(LIBERTY)
            .remove_in(0)
            .notice_for(&Function::new("x", noop))
            .unwrap();
        assert_eq!(notice.as_of, LIBERTY);
    }

    #[test]
    fn test_explicit_what() {
        let wrapped = Marker::new(ICEHOUSE)
            .what("The frobnicate API")
            .remove_in(0)
            .apply(Function::new("frobnicate", noop))
            .unwrap();
        assert_eq!(
            wrapped.notice().message,
            "The frobnicate API is deprecated as of ICEHOUSE. It will not be superseded."
        );
    }

    #[test]
    fn test_empty_strings_mean_unset() {
        let notice = Marker::new(ICEHOUSE)
            .in_favor_of("")
            .what("")
            .notice_for(&Function::new("z", noop))
            .unwrap();
        assert_eq!(notice.what, "z()");
        assert_eq!(notice.in_favor_of, None);
        assert!(notice.message.ends_with("It will not be superseded."));
    }

    struct Shouting;

    impl Translate for Shouting {
        fn translate<'a>(&self, template: &'a str) -> Cow<'a, str> {
            Cow::Owned(template.replace("is deprecated", "IS DEPRECATED"))
        }
    }

    #[test]
    fn test_translator_applied_before_interpolation() {
        let notice = Marker::new(ICEHOUSE)
            .what("is deprecated")
            .remove_in(0)
            .translator(Arc::new(Shouting))
            .notice_for(&Function::new("q", noop))
            .unwrap();
        assert_eq!(
            notice.message,
            "is deprecated IS DEPRECATED as of ICEHOUSE. It will not be superseded."
        );
    }

    #[test]
    fn test_interpolate_single_pass() {
        assert_eq!(
            interpolate("{what} / {as_of}", &[("what", "{as_of}"), ("as_of", "I")]),
            "{as_of} / I"
        );
        assert_eq!(interpolate("{unknown} {", &[]), "{unknown} {");
    }

    #[test]
    fn test_concurrent_calls_each_report() {
        let (sink, seen) = collector();
        let square = Marker::new(ICEHOUSE)
            .log(sink)
            .apply(Function::new("square", |x: u64| x * x))
            .unwrap();

        std::thread::scope(|s| {
            for i in 0..4u64 {
                let square = &square;
                s.spawn(move || assert_eq!(square.call((i,)), i * i));
            }
        });
        assert_eq!(seen.lock().unwrap().len(), 4);
    }

    #[test]
    fn test_notice_serializes() {
        let notice = Marker::new(ICEHOUSE)
            .notice_for(&Function::new("a", noop))
            .unwrap();
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["as_of"], "ICEHOUSE");
        assert_eq!(json["remove_in"], "KILO");
        assert!(json.get("in_favor_of").is_none());
    }
}

//! Things a deprecation marker can be applied to.
//!
//! A target reports what kind of thing it is through [`Deprecatable`], so the
//! marker can reject unsupported targets up front instead of guessing.

use std::borrow::Cow;
use std::fmt;

/// Kind of a deprecation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKind {
    /// A plain callable.
    Function,
    /// Something that builds instances of a type.
    Constructor,
    /// Anything else. Markers refuse these.
    Other(String),
}

impl TargetKind {
    /// Parse a manifest label such as `function` or `class`.
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "function" | "fn" => TargetKind::Function,
            "constructor" | "class" | "type" => TargetKind::Constructor,
            _ => TargetKind::Other(label.to_string()),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Function => f.write_str("function"),
            TargetKind::Constructor => f.write_str("constructor"),
            TargetKind::Other(kind) => f.write_str(kind),
        }
    }
}

/// A target that can carry a deprecation marker.
pub trait Deprecatable {
    /// Name used in notices when the marker has no explicit `what`.
    fn display_name(&self) -> Cow<'_, str>;

    /// What kind of target this is.
    fn kind(&self) -> TargetKind;

    /// Documentation of the target, if any.
    fn doc(&self) -> Option<&str> {
        None
    }
}

/// Calls a callable with its arguments packed in a tuple.
///
/// Implemented for every `Fn` of up to six arguments, so a wrapper can accept
/// any of them while keeping their argument and return types.
pub trait Invoke<Args> {
    type Output;

    fn invoke(&self, args: Args) -> Self::Output;
}

macro_rules! impl_invoke {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg,)*> Invoke<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn invoke(&self, ($($arg,)*): ($($arg,)*)) -> Out {
                (self)($($arg),*)
            }
        }
    };
}

impl_invoke!();
impl_invoke!(A1);
impl_invoke!(A1, A2);
impl_invoke!(A1, A2, A3);
impl_invoke!(A1, A2, A3, A4);
impl_invoke!(A1, A2, A3, A4, A5);
impl_invoke!(A1, A2, A3, A4, A5, A6);

/// A named function-like target.
#[derive(Clone)]
pub struct Function<F> {
    name: String,
    doc: Option<String>,
    func: F,
}

impl<F> Function<F> {
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            doc: None,
            func,
        }
    }

    /// Attach documentation, kept visible on the wrapped function.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn func(&self) -> &F {
        &self.func
    }
}

impl<F> Deprecatable for Function<F> {
    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn kind(&self) -> TargetKind {
        TargetKind::Function
    }

    fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

impl<F> fmt::Debug for Function<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// A constructor-like target: the path through which instances of a type
/// are built.
///
/// Only construction is intercepted; the instances it returns are untouched.
#[derive(Clone)]
pub struct Constructor<F> {
    type_name: String,
    doc: Option<String>,
    build: F,
}

impl<F> Constructor<F> {
    pub fn new(type_name: impl Into<String>, build: F) -> Self {
        Self {
            type_name: type_name.into(),
            doc: None,
            build,
        }
    }

    /// Constructor for `T`, named after the last path segment of `T`.
    pub fn of<T>(build: F) -> Self {
        let full = std::any::type_name::<T>();
        let short = full.rsplit("::").next().unwrap_or(full);
        Self::new(short, build)
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub(crate) fn build(&self) -> &F {
        &self.build
    }
}

impl<F> Deprecatable for Constructor<F> {
    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.type_name)
    }

    fn kind(&self) -> TargetKind {
        TargetKind::Constructor
    }

    fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

impl<F> fmt::Debug for Constructor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("type_name", &self.type_name)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// A target known only by name and kind, as declared in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredTarget {
    pub name: String,
    pub kind: TargetKind,
}

impl DeclaredTarget {
    pub fn new(name: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

impl Deprecatable for DeclaredTarget {
    fn display_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }

    fn kind(&self) -> TargetKind {
        self.kind.clone()
    }
}

//! Hint definitions.
//!
//! Hints are annotations on type declarations and fields that constrain
//! their semantics. Most hints carry no arguments; `owner`, `pragma` and
//! `provider` carry an ordered list of argument names.

use std::collections::BTreeSet;
use std::fmt;

/// Kind of a hint, independent of its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HintKind {
    /// Setters may be called on otherwise constant fields.
    ConstantMutator,
    /// Field data is stored in a side table.
    Distributed,
    /// Instances are stored without a type hierarchy.
    Flat,
    /// Generated accessors are not part of the public interface.
    Hide,
    /// The field is not represented in generated bindings.
    Ignore,
    /// The declaration is a mixin.
    Mixin,
    /// Instances of the type hierarchy cannot be deleted.
    Monotone,
    /// Field data is materialized lazily.
    OnDemand,
    /// The declaration has no observable side effects.
    Pure,
    /// Instances of the type hierarchy cannot be modified.
    ReadOnly,
    /// Drops all restrictions inherited from the schema.
    RemoveRestrictions,
    /// Instances are unique by value.
    Unique,
    /// Declares the owning tools of a declaration.
    Owner,
    /// Tool-specific pragma.
    Pragma,
    /// Declares the providing tools of a declaration.
    Provider,
}

impl HintKind {
    /// All hint kinds in declaration order.
    pub const ALL: [Self; 15] = [
        Self::ConstantMutator,
        Self::Distributed,
        Self::Flat,
        Self::Hide,
        Self::Ignore,
        Self::Mixin,
        Self::Monotone,
        Self::OnDemand,
        Self::Pure,
        Self::ReadOnly,
        Self::RemoveRestrictions,
        Self::Unique,
        Self::Owner,
        Self::Pragma,
        Self::Provider,
    ];

    /// Returns the schema spelling of the hint kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ConstantMutator => "constantMutator",
            Self::Distributed => "distributed",
            Self::Flat => "flat",
            Self::Hide => "hide",
            Self::Ignore => "ignore",
            Self::Mixin => "mixin",
            Self::Monotone => "monotone",
            Self::OnDemand => "onDemand",
            Self::Pure => "pure",
            Self::ReadOnly => "readOnly",
            Self::RemoveRestrictions => "removeRestrictions",
            Self::Unique => "unique",
            Self::Owner => "owner",
            Self::Pragma => "pragma",
            Self::Provider => "provider",
        }
    }

    /// Parses a hint kind from its schema spelling, ignoring case.
    ///
    /// `lazy` is accepted as an alias of `onDemand`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lowercase = name.to_ascii_lowercase();
        if lowercase == "lazy" {
            return Some(Self::OnDemand);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(&lowercase))
    }

    /// Returns true if hints of this kind carry arguments.
    #[must_use]
    pub const fn takes_arguments(self) -> bool {
        matches!(self, Self::Owner | Self::Pragma | Self::Provider)
    }
}

impl fmt::Display for HintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A hint attached to a declaration or field.
///
/// Equality is structural: two `readOnly` hints are always equal, two
/// `owner` hints are equal when their argument lists are.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hint {
    /// `!constantMutator`
    ConstantMutator,
    /// `!distributed`
    Distributed,
    /// `!flat`
    Flat,
    /// `!hide`
    Hide,
    /// `!ignore`
    Ignore,
    /// `!mixin`
    Mixin,
    /// `!monotone`
    Monotone,
    /// `!onDemand`
    OnDemand,
    /// `!pure`
    Pure,
    /// `!readOnly`
    ReadOnly,
    /// `!removeRestrictions`
    RemoveRestrictions,
    /// `!unique`
    Unique,
    /// `!owner(..)`
    Owner(Vec<String>),
    /// `!pragma(..)`
    Pragma(Vec<String>),
    /// `!provider(..)`
    Provider(Vec<String>),
}

impl Hint {
    /// Creates a hint of the given kind without arguments.
    #[must_use]
    pub fn from_kind(kind: HintKind) -> Self {
        match kind {
            HintKind::ConstantMutator => Self::ConstantMutator,
            HintKind::Distributed => Self::Distributed,
            HintKind::Flat => Self::Flat,
            HintKind::Hide => Self::Hide,
            HintKind::Ignore => Self::Ignore,
            HintKind::Mixin => Self::Mixin,
            HintKind::Monotone => Self::Monotone,
            HintKind::OnDemand => Self::OnDemand,
            HintKind::Pure => Self::Pure,
            HintKind::ReadOnly => Self::ReadOnly,
            HintKind::RemoveRestrictions => Self::RemoveRestrictions,
            HintKind::Unique => Self::Unique,
            HintKind::Owner => Self::Owner(Vec::new()),
            HintKind::Pragma => Self::Pragma(Vec::new()),
            HintKind::Provider => Self::Provider(Vec::new()),
        }
    }

    /// Creates a hint with arguments.
    ///
    /// Returns `None` if arguments are supplied for a kind that takes none.
    #[must_use]
    pub fn with_arguments(kind: HintKind, arguments: Vec<String>) -> Option<Self> {
        match kind {
            HintKind::Owner => Some(Self::Owner(arguments)),
            HintKind::Pragma => Some(Self::Pragma(arguments)),
            HintKind::Provider => Some(Self::Provider(arguments)),
            _ if arguments.is_empty() => Some(Self::from_kind(kind)),
            _ => None,
        }
    }

    /// Returns the kind of this hint.
    #[must_use]
    pub const fn kind(&self) -> HintKind {
        match self {
            Self::ConstantMutator => HintKind::ConstantMutator,
            Self::Distributed => HintKind::Distributed,
            Self::Flat => HintKind::Flat,
            Self::Hide => HintKind::Hide,
            Self::Ignore => HintKind::Ignore,
            Self::Mixin => HintKind::Mixin,
            Self::Monotone => HintKind::Monotone,
            Self::OnDemand => HintKind::OnDemand,
            Self::Pure => HintKind::Pure,
            Self::ReadOnly => HintKind::ReadOnly,
            Self::RemoveRestrictions => HintKind::RemoveRestrictions,
            Self::Unique => HintKind::Unique,
            Self::Owner(_) => HintKind::Owner,
            Self::Pragma(_) => HintKind::Pragma,
            Self::Provider(_) => HintKind::Provider,
        }
    }

    /// Returns the argument names of this hint.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        match self {
            Self::Owner(args) | Self::Pragma(args) | Self::Provider(args) => args,
            _ => &[],
        }
    }
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", self.kind())?;
        if self.kind().takes_arguments() {
            write!(f, "({})", self.arguments().join(", "))?;
        }
        Ok(())
    }
}

/// Set of hints attached to a declaration or field, kept in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintSet {
    hints: BTreeSet<Hint>,
}

impl HintSet {
    /// Creates an empty hint set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hint. Returns false if an equal hint was already present.
    pub fn insert(&mut self, hint: Hint) -> bool {
        self.hints.insert(hint)
    }

    /// Returns true if a hint of the given kind is present.
    #[must_use]
    pub fn contains(&self, kind: HintKind) -> bool {
        self.hints.iter().any(|hint| hint.kind() == kind)
    }

    /// Returns the first hint of the given kind.
    #[must_use]
    pub fn get(&self, kind: HintKind) -> Option<&Hint> {
        self.hints.iter().find(|hint| hint.kind() == kind)
    }

    /// Iterates over the hints in their stable order.
    pub fn iter(&self) -> impl Iterator<Item = &Hint> {
        self.hints.iter()
    }

    /// Returns the number of hints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hints.len()
    }

    /// Returns true if there are no hints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }
}

impl FromIterator<Hint> for HintSet {
    fn from_iter<I: IntoIterator<Item = Hint>>(iter: I) -> Self {
        Self {
            hints: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a HintSet {
    type Item = &'a Hint;
    type IntoIter = std::collections::btree_set::Iter<'a, Hint>;

    fn into_iter(self) -> Self::IntoIter {
        self.hints.iter()
    }
}

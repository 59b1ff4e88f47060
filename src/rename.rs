//! Selective symbol renaming.
//!
//! A [`Renamer`] binds one [`NameTable`] to a set of enabled symbol kinds.
//! For an enabled kind, [`Renamer::decide`] looks the mapped (srg) name up
//! in the table, falling back to the mapped name itself when the table has
//! no entry. For a disabled kind the mapped name passes through untouched —
//! exactly what the table would have produced on its own.
//!
//! Each renamer is an independent, immutable value; concurrent rename
//! operations over different renamers share nothing.

use crate::names::NameTable;

// ---------------------------------------------------------------------------
// SymbolKind
// ---------------------------------------------------------------------------

/// The closed set of symbol kinds a renaming table records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Package,
    Class,
    Field,
    Method,
    Parameter,
}

impl SymbolKind {
    /// All kinds, in table-record order.
    pub const ALL: [Self; 5] = [
        Self::Package,
        Self::Class,
        Self::Field,
        Self::Method,
        Self::Parameter,
    ];
}

// ---------------------------------------------------------------------------
// KindSet
// ---------------------------------------------------------------------------

/// The per-kind enable flags of a renamer.
///
/// A plain copyable record; [`KindSet::with`] is idempotent, so enabling the
/// same kind twice is harmless.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindSet {
    packages: bool,
    classes: bool,
    fields: bool,
    methods: bool,
    parameters: bool,
}

impl KindSet {
    /// No kinds enabled.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            packages: false,
            classes: false,
            fields: false,
            methods: false,
            parameters: false,
        }
    }

    /// This set with `kind` enabled.
    #[must_use]
    pub const fn with(mut self, kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Package => self.packages = true,
            SymbolKind::Class => self.classes = true,
            SymbolKind::Field => self.fields = true,
            SymbolKind::Method => self.methods = true,
            SymbolKind::Parameter => self.parameters = true,
        }
        self
    }

    /// Whether `kind` is enabled.
    #[must_use]
    pub const fn contains(self, kind: SymbolKind) -> bool {
        match kind {
            SymbolKind::Package => self.packages,
            SymbolKind::Class => self.classes,
            SymbolKind::Field => self.fields,
            SymbolKind::Method => self.methods,
            SymbolKind::Parameter => self.parameters,
        }
    }

    /// The member kinds renamed when deriving a readable table: methods and
    /// fields. Packages, classes and parameters are deliberately excluded —
    /// classes/packages keep their srg structure and parameters are carried
    /// by the joined archive instead.
    #[must_use]
    pub const fn members() -> Self {
        Self::empty().with(SymbolKind::Method).with(SymbolKind::Field)
    }
}

// ---------------------------------------------------------------------------
// Renamer
// ---------------------------------------------------------------------------

/// An immutable renaming strategy: one name lookup plus enabled kinds.
#[derive(Clone, Debug)]
pub struct Renamer {
    names: NameTable,
    kinds: KindSet,
}

impl Renamer {
    /// Bind a name table to a set of enabled kinds.
    #[must_use]
    pub const fn new(names: NameTable, kinds: KindSet) -> Self {
        Self { names, kinds }
    }

    /// The outward name for a symbol of `kind` whose mapped name is
    /// `mapped`.
    ///
    /// Total: enabled kinds rename via lookup with identity fallback,
    /// disabled kinds pass through. Never fails.
    #[must_use]
    pub fn decide<'a>(&'a self, kind: SymbolKind, mapped: &'a str) -> &'a str {
        if self.kinds.contains(kind) {
            self.names.rename(mapped)
        } else {
            mapped
        }
    }

    /// The enabled kinds.
    #[must_use]
    pub const fn kinds(&self) -> KindSet {
        self.kinds
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

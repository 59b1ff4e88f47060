//! In-memory renaming tables and their algebra.
//!
//! A [`MappingFile`] is an ordered collection of symbol records — packages,
//! classes, fields, methods, parameters — each carrying a source (`obf`) and
//! a mapped (`srg`) name. The interesting operations are the table algebra:
//!
//! - [`MappingFile::reverse`] swaps source and target;
//! - [`MappingFile::chain`] composes two tables A→B and B→C into A→C;
//! - [`MappingFile::rename`] replaces mapped names per a [`Renamer`];
//! - [`MappingFile::load`] / [`MappingFile::write`] read and write a
//!   minimal TSRG-style line format (plus classic SRG output).
//!
//! The line format is deliberately small — it exists so the generate
//! pipeline is executable, not as an interchange format definition.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::RemapError;
use crate::rename::{Renamer, SymbolKind};

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

/// Output serialization format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Tab-indented TSRG-style lines (the default; the only loadable one).
    #[default]
    Tsrg,
    /// Classic prefixed SRG lines (`PK:`/`CL:`/`FD:`/`MD:`).
    Srg,
}

impl Format {
    /// The selector string for this format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tsrg => "tsrg",
            Self::Srg => "srg",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = RemapError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tsrg" => Ok(Self::Tsrg),
            "srg" => Ok(Self::Srg),
            other => Err(RemapError::UnknownFormat {
                value: other.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A package mapping (names without trailing slash).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageRecord {
    pub obf: String,
    pub srg: String,
}

/// A field mapping within a class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRecord {
    pub obf: String,
    pub srg: String,
}

/// A parameter mapping within a method, keyed by parameter index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamRecord {
    pub index: u16,
    pub obf: String,
    pub srg: String,
}

/// A method mapping within a class. The descriptor is in the table's
/// *source* namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodRecord {
    pub obf: String,
    pub desc: String,
    pub srg: String,
    pub params: Vec<ParamRecord>,
}

/// A class mapping with its member records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassRecord {
    pub obf: String,
    pub srg: String,
    pub fields: Vec<FieldRecord>,
    pub methods: Vec<MethodRecord>,
}

// ---------------------------------------------------------------------------
// MappingFile
// ---------------------------------------------------------------------------

/// An ordered renaming table, source (`obf`) → target (`srg`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappingFile {
    pub packages: Vec<PackageRecord>,
    pub classes: Vec<ClassRecord>,
}

impl MappingFile {
    /// Load a TSRG-style table from `path`.
    ///
    /// # Errors
    /// Returns [`RemapError::Table`] with a line-numbered detail if the file
    /// cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, RemapError> {
        let content = fs::read_to_string(path).map_err(|e| RemapError::Table {
            path: path.to_path_buf(),
            detail: format!("read failed: {e}"),
        })?;
        Self::parse_tsrg(&content).map_err(|detail| RemapError::Table {
            path: path.to_path_buf(),
            detail,
        })
    }

    /// Find a class record by its source name.
    #[must_use]
    pub fn find_class(&self, obf: &str) -> Option<&ClassRecord> {
        self.classes.iter().find(|c| c.obf == obf)
    }

    /// The reversed table (target → source).
    ///
    /// Where two records collapse onto the same reversed key (a many-to-one
    /// mapping), the *first* record wins and later ones are dropped. Method
    /// descriptors are remapped into the reversed table's source namespace.
    #[must_use]
    pub fn reverse(&self) -> Self {
        let class_map = self.class_map();

        let mut packages = Vec::with_capacity(self.packages.len());
        let mut seen_packages = BTreeSet::new();
        for p in &self.packages {
            if seen_packages.insert(p.srg.as_str()) {
                packages.push(PackageRecord {
                    obf: p.srg.clone(),
                    srg: p.obf.clone(),
                });
            }
        }

        let mut classes = Vec::with_capacity(self.classes.len());
        let mut seen_classes = BTreeSet::new();
        for c in &self.classes {
            if !seen_classes.insert(c.srg.as_str()) {
                continue;
            }

            let mut fields = Vec::with_capacity(c.fields.len());
            let mut seen_fields = BTreeSet::new();
            for f in &c.fields {
                if seen_fields.insert(f.srg.as_str()) {
                    fields.push(FieldRecord {
                        obf: f.srg.clone(),
                        srg: f.obf.clone(),
                    });
                }
            }

            let mut methods = Vec::with_capacity(c.methods.len());
            let mut seen_methods = BTreeSet::new();
            for m in &c.methods {
                let desc = remap_descriptor(&m.desc, &class_map);
                if seen_methods.insert((m.srg.clone(), desc.clone())) {
                    methods.push(MethodRecord {
                        obf: m.srg.clone(),
                        desc,
                        srg: m.obf.clone(),
                        params: m
                            .params
                            .iter()
                            .map(|p| ParamRecord {
                                index: p.index,
                                obf: p.srg.clone(),
                                srg: p.obf.clone(),
                            })
                            .collect(),
                    });
                }
            }

            classes.push(ClassRecord {
                obf: c.srg.clone(),
                srg: c.obf.clone(),
                fields,
                methods,
            });
        }

        Self { packages, classes }
    }

    /// Compose this table (A→B) with `other` (B→C) into A→C.
    ///
    /// Records are matched by this table's target name against `other`'s
    /// source name; classes by name, members by name within the matched
    /// class (descriptors do not participate in matching), parameters by
    /// index. A record with no match in `other` keeps its current target
    /// (identity fallback).
    #[must_use]
    pub fn chain(&self, other: &Self) -> Self {
        let other_packages: BTreeMap<&str, &str> = other
            .packages
            .iter()
            .map(|p| (p.obf.as_str(), p.srg.as_str()))
            .collect();
        let other_classes: BTreeMap<&str, &ClassRecord> =
            other.classes.iter().map(|c| (c.obf.as_str(), c)).collect();

        let packages = self
            .packages
            .iter()
            .map(|p| PackageRecord {
                obf: p.obf.clone(),
                srg: (*other_packages.get(p.srg.as_str()).unwrap_or(&p.srg.as_str()))
                    .to_owned(),
            })
            .collect();

        let classes = self
            .classes
            .iter()
            .map(|c| {
                let matched = other_classes.get(c.srg.as_str()).copied();
                ClassRecord {
                    obf: c.obf.clone(),
                    srg: matched.map_or_else(|| c.srg.clone(), |m| m.srg.clone()),
                    fields: c
                        .fields
                        .iter()
                        .map(|f| FieldRecord {
                            obf: f.obf.clone(),
                            srg: matched
                                .and_then(|m| m.fields.iter().find(|of| of.obf == f.srg))
                                .map_or_else(|| f.srg.clone(), |of| of.srg.clone()),
                        })
                        .collect(),
                    methods: c
                        .methods
                        .iter()
                        .map(|m| {
                            let other_method = matched
                                .and_then(|mc| mc.methods.iter().find(|om| om.obf == m.srg));
                            MethodRecord {
                                obf: m.obf.clone(),
                                desc: m.desc.clone(),
                                srg: other_method
                                    .map_or_else(|| m.srg.clone(), |om| om.srg.clone()),
                                params: m
                                    .params
                                    .iter()
                                    .map(|p| ParamRecord {
                                        index: p.index,
                                        obf: p.obf.clone(),
                                        srg: other_method
                                            .and_then(|om| {
                                                om.params.iter().find(|op| op.index == p.index)
                                            })
                                            .map_or_else(|| p.srg.clone(), |op| op.srg.clone()),
                                    })
                                    .collect(),
                            }
                        })
                        .collect(),
                }
            })
            .collect();

        Self { packages, classes }
    }

    /// A new table with each record's mapped name replaced per `renamer`.
    ///
    /// Source names and descriptors are untouched; only the outward (target)
    /// side changes.
    #[must_use]
    pub fn rename(&self, renamer: &Renamer) -> Self {
        let packages = self
            .packages
            .iter()
            .map(|p| PackageRecord {
                obf: p.obf.clone(),
                srg: renamer.decide(SymbolKind::Package, &p.srg).to_owned(),
            })
            .collect();

        let classes = self
            .classes
            .iter()
            .map(|c| ClassRecord {
                obf: c.obf.clone(),
                srg: renamer.decide(SymbolKind::Class, &c.srg).to_owned(),
                fields: c
                    .fields
                    .iter()
                    .map(|f| FieldRecord {
                        obf: f.obf.clone(),
                        srg: renamer.decide(SymbolKind::Field, &f.srg).to_owned(),
                    })
                    .collect(),
                methods: c
                    .methods
                    .iter()
                    .map(|m| MethodRecord {
                        obf: m.obf.clone(),
                        desc: m.desc.clone(),
                        srg: renamer.decide(SymbolKind::Method, &m.srg).to_owned(),
                        params: m
                            .params
                            .iter()
                            .map(|p| ParamRecord {
                                index: p.index,
                                obf: p.obf.clone(),
                                srg: renamer.decide(SymbolKind::Parameter, &p.srg).to_owned(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self { packages, classes }
    }

    /// Serialize to `path` in `format`, reversing first when `reversed`.
    ///
    /// Creates missing parent directories.
    ///
    /// # Errors
    /// Returns [`RemapError::Table`] if the file cannot be written.
    pub fn write(&self, path: &Path, format: Format, reversed: bool) -> Result<(), RemapError> {
        let table = if reversed { self.reverse() } else { self.clone() };
        let content = match format {
            Format::Tsrg => table.render_tsrg(),
            Format::Srg => table.render_srg(),
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| RemapError::Table {
                path: path.to_path_buf(),
                detail: format!("create parent directory failed: {e}"),
            })?;
        }
        fs::write(path, content).map_err(|e| RemapError::Table {
            path: path.to_path_buf(),
            detail: format!("write failed: {e}"),
        })
    }

    // -- parsing --

    fn parse_tsrg(content: &str) -> Result<Self, String> {
        let mut table = Self::default();
        for (number, raw) in content.lines().enumerate() {
            let line_no = number + 1;
            if number == 0 && raw.starts_with("tsrg2") {
                continue;
            }
            if raw.trim().is_empty() || raw.starts_with('#') {
                continue;
            }

            if let Some(rest) = raw.strip_prefix("\t\t") {
                table.parse_param_line(rest, line_no)?;
            } else if let Some(rest) = raw.strip_prefix('\t') {
                table.parse_member_line(rest, line_no)?;
            } else {
                table.parse_top_line(raw, line_no)?;
            }
        }
        Ok(table)
    }

    fn parse_top_line(&mut self, line: &str, line_no: usize) -> Result<(), String> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [obf, srg] = tokens[..] else {
            return Err(format!("line {line_no}: expected '<source> <target>'"));
        };
        if let (Some(obf), Some(srg)) = (obf.strip_suffix('/'), srg.strip_suffix('/')) {
            self.packages.push(PackageRecord {
                obf: obf.to_owned(),
                srg: srg.to_owned(),
            });
        } else {
            self.classes.push(ClassRecord {
                obf: obf.to_owned(),
                srg: srg.to_owned(),
                fields: Vec::new(),
                methods: Vec::new(),
            });
        }
        Ok(())
    }

    fn parse_member_line(&mut self, line: &str, line_no: usize) -> Result<(), String> {
        let Some(class) = self.classes.last_mut() else {
            return Err(format!("line {line_no}: member record outside a class"));
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens[..] {
            [obf, srg] => {
                class.fields.push(FieldRecord {
                    obf: obf.to_owned(),
                    srg: srg.to_owned(),
                });
                Ok(())
            }
            [obf, desc, srg] if desc.starts_with('(') => {
                class.methods.push(MethodRecord {
                    obf: obf.to_owned(),
                    desc: desc.to_owned(),
                    srg: srg.to_owned(),
                    params: Vec::new(),
                });
                Ok(())
            }
            _ => Err(format!(
                "line {line_no}: expected '<field> <target>' or '<method> (<desc>) <target>'"
            )),
        }
    }

    fn parse_param_line(&mut self, line: &str, line_no: usize) -> Result<(), String> {
        let Some(method) = self
            .classes
            .last_mut()
            .and_then(|c| c.methods.last_mut())
        else {
            return Err(format!("line {line_no}: parameter record outside a method"));
        };
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let [index, obf, srg] = tokens[..] else {
            return Err(format!(
                "line {line_no}: expected '<index> <source> <target>'"
            ));
        };
        let index: u16 = index
            .parse()
            .map_err(|_| format!("line {line_no}: parameter index '{index}' is not a number"))?;
        method.params.push(ParamRecord {
            index,
            obf: obf.to_owned(),
            srg: srg.to_owned(),
        });
        Ok(())
    }

    // -- rendering --

    fn render_tsrg(&self) -> String {
        let mut out = String::from("tsrg2 left right\n");
        for p in &self.packages {
            let _ = writeln!(out, "{}/ {}/", p.obf, p.srg);
        }
        for c in &self.classes {
            let _ = writeln!(out, "{} {}", c.obf, c.srg);
            for f in &c.fields {
                let _ = writeln!(out, "\t{} {}", f.obf, f.srg);
            }
            for m in &c.methods {
                let _ = writeln!(out, "\t{} {} {}", m.obf, m.desc, m.srg);
                for p in &m.params {
                    let _ = writeln!(out, "\t\t{} {} {}", p.index, p.obf, p.srg);
                }
            }
        }
        out
    }

    /// Classic SRG output. Parameters have no SRG representation and are
    /// omitted; method descriptors are emitted in both namespaces.
    fn render_srg(&self) -> String {
        let class_map = self.class_map();
        let mut out = String::new();
        for p in &self.packages {
            let _ = writeln!(out, "PK: {} {}", p.obf, p.srg);
        }
        for c in &self.classes {
            let _ = writeln!(out, "CL: {} {}", c.obf, c.srg);
        }
        for c in &self.classes {
            for f in &c.fields {
                let _ = writeln!(out, "FD: {}/{} {}/{}", c.obf, f.obf, c.srg, f.srg);
            }
            for m in &c.methods {
                let _ = writeln!(
                    out,
                    "MD: {}/{} {} {}/{} {}",
                    c.obf,
                    m.obf,
                    m.desc,
                    c.srg,
                    m.srg,
                    remap_descriptor(&m.desc, &class_map)
                );
            }
        }
        out
    }

    fn class_map(&self) -> BTreeMap<&str, &str> {
        self.classes
            .iter()
            .map(|c| (c.obf.as_str(), c.srg.as_str()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Descriptor remapping
// ---------------------------------------------------------------------------

/// Rewrite every `L<class>;` object reference in a JVM descriptor through
/// the class map, leaving primitives and unmapped classes alone.
fn remap_descriptor(desc: &str, classes: &BTreeMap<&str, &str>) -> String {
    let mut out = String::with_capacity(desc.len());
    let mut rest = desc;
    while let Some(pos) = rest.find('L') {
        out.push_str(&rest[..=pos]);
        rest = &rest[pos + 1..];
        let Some(end) = rest.find(';') else {
            // Truncated descriptor; emit as-is rather than guessing.
            out.push_str(rest);
            return out;
        };
        let name = &rest[..end];
        out.push_str(classes.get(name).copied().unwrap_or(name));
        out.push(';');
        rest = &rest[end + 1..];
    }
    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! # archgraph-core
//!
//! Architecture rules over compiled JVM classes.
//!
//! This crate reads class files, links them into a [`ClassGraph`] and
//! checks architecture rules against it. It includes:
//!
//! - [`ArtifactReader`] for decoding class files into descriptors
//! - [`GraphBuilder`] and [`Importer`] for building the class graph
//! - [`Predicate`] combinators describing sets of classes, members and accesses
//! - [`ConditionRule`] and [`CycleRule`] implementing [`ArchRule`]
//! - [`Evaluator`] for running many rules and collecting a [`Report`]
//!
//! ## Example
//!
//! ```ignore
//! use archgraph_core::{predicate::reside_in, Condition, ConditionRule, ElementKind, Evaluator, Importer, Severity};
//!
//! let import = Importer::new().import_paths(&paths)?;
//! let rule = ConditionRule::new(
//!     "report-not-importer",
//!     ElementKind::Class,
//!     reside_in("..report..")?,
//!     Condition::not_depend_on(reside_in("..importer..")?),
//! )?;
//!
//! let report = Evaluator::builder().rule(rule).build().evaluate(&import.graph);
//! println!("{}", report.format_test_report(Severity::Error));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builtin;
pub mod classfile;
mod condition;
mod config;
pub mod declarative;
mod evaluator;
pub mod graph;
mod importer;
pub mod names;
pub mod pattern;
pub mod predicate;
pub mod raw;
mod rule;
pub mod slices;
pub mod testing;
mod types;

pub use classfile::{ArtifactReader, MalformedArtifactError};
pub use condition::{Condition, ConditionRule, RuleError};
pub use config::{Config, ConfigError, ImportConfig, RuleConfig};
pub use evaluator::{Evaluator, EvaluatorBuilder};
pub use graph::{BuildError, ClassGraph, ExternalResolver, GraphBuilder};
pub use importer::{Artifact, Import, ImportError, Importer, SkippedArtifact};
pub use pattern::{PackagePattern, PatternError};
pub use predicate::{Element, ElementKind, KindSet, Predicate, PredicateError};
pub use raw::{AccessKind, MemberKind, Modifier, RawClassDescriptor};
pub use rule::{ArchRule, ArchRuleBox};
pub use slices::{detect_cycles, Cycle, CycleRule, Hop, SliceError, SliceGraph, Slicing};
pub use types::{Evidence, Location, Report, RuleOutcome, Severity, Violation};

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::company::{CompanyColor, CompanyPalette};
use crate::config::ChartConfig;
use crate::org::filter::{filter_forest, CompanyFilter};
use crate::org::hierarchy::build_forest;
use crate::org::manager::ManagerIndex;
use crate::org::normalize::normalize_rows;
use crate::org::{EmployeeRecord, Forest, RawRow};
use crate::source::{load_rows, SourceErrorKind};

/// Error during chart loading
#[derive(Debug)]
pub struct LoadError {
    pub message: String,
    /// `"read"`, `"parse"` or `"config"`
    pub phase: &'static str,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.phase, self.message)
    }
}

impl std::error::Error for LoadError {}

/// Counts reported after a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChartStats {
    pub records: usize,
    pub roots: usize,
    pub managers: usize,
    /// Records whose `ManagerId` names no record
    pub orphans: usize,
    /// Records that appear nowhere in the forest (shadowed duplicates, cycles)
    pub unreachable: usize,
}

impl std::fmt::Display for ChartStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records, {} roots, {} managers, {} orphans, {} unreachable",
            self.records, self.roots, self.managers, self.orphans, self.unreachable
        )
    }
}

/// The chart pipeline: Rows → Normalize → Link → (Filter on demand)
///
/// Holds the complete record set, its forest and the manager index. A new
/// file means a new engine; nothing is patched in place.
pub struct ChartEngine {
    records: Vec<Arc<EmployeeRecord>>,
    forest: Forest,
    managers: ManagerIndex,
    palette: CompanyPalette,
    source: Option<PathBuf>,
}

impl ChartEngine {
    pub fn from_rows(rows: Vec<RawRow>, palette: CompanyPalette) -> Self {
        let records = normalize_rows(rows);
        let forest = build_forest(&records);
        let managers = ManagerIndex::build(&records);
        Self {
            records,
            forest,
            managers,
            palette,
            source: None,
        }
    }

    /// Read a rows file (JSON or spreadsheet) and build the chart from it.
    pub fn load(path: &Path, palette: CompanyPalette) -> Result<Self, LoadError> {
        let rows = load_rows(path).map_err(|e| LoadError {
            phase: match e.kind {
                SourceErrorKind::Read => "read",
                SourceErrorKind::Parse => "parse",
            },
            message: e.message,
        })?;

        let mut engine = Self::from_rows(rows, palette);
        engine.source = Some(path.to_path_buf());
        log::info!("Loaded {}: {}", path.display(), engine.stats());
        Ok(engine)
    }

    pub fn records(&self) -> &[Arc<EmployeeRecord>] {
        &self.records
    }

    /// The unfiltered forest.
    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn filtered(&self, filter: &CompanyFilter) -> Cow<'_, Forest> {
        filter_forest(&self.forest, filter)
    }

    pub fn is_manager(&self, record: &EmployeeRecord) -> bool {
        self.managers.is_manager(record)
    }

    pub fn company_color(&self, record: &EmployeeRecord) -> CompanyColor {
        self.palette.resolve(record.company().as_deref())
    }

    pub fn palette(&self) -> &CompanyPalette {
        &self.palette
    }

    /// File this engine was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn stats(&self) -> ChartStats {
        let ids: HashSet<&str> = self.records.iter().filter_map(|r| r.id()).collect();
        let orphans = self
            .records
            .iter()
            .filter_map(|r| r.manager_ref())
            .filter(|m| !ids.contains(m))
            .count();
        let placed: HashSet<_> = self.forest.iter().map(|n| n.key()).collect();

        ChartStats {
            records: self.records.len(),
            roots: self.forest.roots().len(),
            managers: self.records.iter().filter(|r| self.is_manager(r)).count(),
            orphans,
            unreachable: self.records.len() - placed.len(),
        }
    }
}

/// Load a config file, reporting failures in the `config` phase.
pub fn load_config(path: &Path) -> Result<ChartConfig, LoadError> {
    ChartConfig::load(path).map_err(|e| LoadError {
        message: e.message,
        phase: "config",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::Rgba;
    use crate::org::testing::outline;
    use serde_json::{json, Value};

    fn rows(value: Value) -> Vec<RawRow> {
        crate::source::rows_from_value(value).unwrap()
    }

    fn sample() -> ChartEngine {
        ChartEngine::from_rows(
            rows(json!([
                {"Id": 1, "Name": "Boss", "Company": "УК"},
                {"Id": 2, "ManagerId": 1, "Company": "ДК"},
                {"Id": 3, "ManagerId": 1, "Company": "УК, ДК"},
                {"Id": 4, "ManagerId": 9, "Company": "РТ"},
            ])),
            CompanyPalette::default(),
        )
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("orgchart-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn builds_forest_from_rows() {
        let engine = sample();
        assert_eq!(outline(engine.forest().roots()), "1[2,3],4");
        assert_eq!(engine.records().len(), 4);
        assert!(engine.source().is_none());
    }

    #[test]
    fn manager_flag_ignores_filter() {
        let engine = sample();
        let filtered = engine.filtered(&CompanyFilter::company("РТ"));
        assert_eq!(outline(filtered.roots()), "4");
        let boss = &engine.forest().roots()[0];
        assert!(engine.is_manager(&boss.record));
        assert!(!engine.is_manager(&filtered.roots()[0].record));
    }

    #[test]
    fn colors_come_from_palette() {
        let engine = sample();
        let recs = engine.records();
        assert_eq!(engine.company_color(&recs[0]), CompanyColor::Solid(Rgba::rgb(0xe0, 0xf2, 0xff)));
        assert!(engine.company_color(&recs[2]).is_blend());
    }

    #[test]
    fn stats_count_structure() {
        let stats = sample().stats();
        assert_eq!(
            stats,
            ChartStats {
                records: 4,
                roots: 2,
                managers: 1,
                orphans: 1,
                unreachable: 0,
            }
        );
        assert_eq!(stats.to_string(), "4 records, 2 roots, 1 managers, 1 orphans, 0 unreachable");
    }

    #[test]
    fn stats_count_cycles_as_unreachable() {
        let engine = ChartEngine::from_rows(
            rows(json!([
                {"Id": "a", "ManagerId": "b"},
                {"Id": "b", "ManagerId": "a"},
                {"Id": "c"},
            ])),
            CompanyPalette::default(),
        );
        let stats = engine.stats();
        assert_eq!(stats.roots, 1);
        assert_eq!(stats.unreachable, 2);
    }

    #[test]
    fn load_reads_file() {
        let path = temp_file("rows.json", r#"[{"Id": 1}, {"Id": 2, "ManagerId": 1}]"#);
        let engine = ChartEngine::load(&path, CompanyPalette::default()).unwrap();
        assert_eq!(outline(engine.forest().roots()), "1[2]");
        assert_eq!(engine.source(), Some(path.as_path()));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_errors_carry_phase() {
        let missing = ChartEngine::load(Path::new("/nonexistent/rows.json"), CompanyPalette::default());
        assert_eq!(missing.err().map(|e| e.phase), Some("read"));

        let path = temp_file("broken.json", "{ not json");
        let broken = ChartEngine::load(&path, CompanyPalette::default());
        let err = broken.err().unwrap();
        assert_eq!(err.phase, "parse");
        assert!(err.to_string().starts_with("[parse] "));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_reads_spreadsheet() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/employees.xlsx");
        let engine = ChartEngine::load(&path, CompanyPalette::default()).unwrap();
        assert_eq!(outline(engine.forest().roots()), "1[2,3]");
        assert!(engine.company_color(&engine.records()[1]).is_blend());
        assert_eq!(engine.stats().managers, 1);
    }

    #[test]
    fn broken_spreadsheet_is_a_parse_error() {
        let path = temp_file("broken.xlsx", "plain text, not a workbook");
        let err = ChartEngine::load(&path, CompanyPalette::default()).err().unwrap();
        assert_eq!(err.phase, "parse");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn long_chain_runs_on_a_small_stack() {
        let (stats, filtered) = crate::org::testing::run_on_small_stack(|| {
            let rows: Vec<RawRow> = (0..20_000)
                .map(|i: i64| {
                    let mut row = RawRow::new();
                    row.insert("Id".into(), json!(i));
                    if i > 0 {
                        row.insert("ManagerId".into(), json!(i - 1));
                    }
                    row.insert("Company".into(), json!(if i == 19_999 { "РТ" } else { "УК" }));
                    row
                })
                .collect();
            let engine = ChartEngine::from_rows(rows, CompanyPalette::default());
            let filtered = engine.filtered(&CompanyFilter::company("РТ")).node_count();
            (engine.stats(), filtered)
        });
        assert_eq!(stats.records, 20_000);
        assert_eq!(stats.roots, 1);
        assert_eq!(stats.managers, 19_999);
        assert_eq!(stats.unreachable, 0);
        assert_eq!(filtered, 20_000);
    }

    #[test]
    fn config_errors_carry_phase() {
        let path = temp_file("config.json", r#"{ "palette": { "unknown": "nope" } }"#);
        let err = load_config(&path).unwrap_err();
        assert_eq!(err.phase, "config");
        let _ = std::fs::remove_file(path);
    }
}

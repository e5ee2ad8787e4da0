use std::collections::{HashMap, HashSet};
use std::fmt;

use sr_core::{HashLocation, RouteDefinition};

use crate::parser::RouteTable;

/// A lint finding. None of these stop a table from compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    EmptySlot {
        slot: String,
    },
    /// A later route repeats an earlier pattern and can never match
    DuplicatePattern {
        pattern: String,
        first: (String, usize),
        duplicate: (String, usize),
    },
    DuplicateParam {
        view: String,
        param: String,
    },
    UnroutableHome {
        home_path: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::EmptySlot { slot } => write!(f, "slot '{slot}' has no routes"),
            Warning::DuplicatePattern {
                pattern,
                first,
                duplicate,
            } => write!(
                f,
                "pattern '{pattern}' at {}[{}] repeats {}[{}] and is unreachable",
                duplicate.0, duplicate.1, first.0, first.1
            ),
            Warning::DuplicateParam { view, param } => {
                write!(f, "view '{view}' names param '{param}' more than once")
            }
            Warning::UnroutableHome { home_path } => {
                write!(f, "home path '{home_path}' matches no route")
            }
        }
    }
}

pub struct AnalyzeReport {
    pub slots: usize,
    pub routes: usize,
    pub warnings: Vec<Warning>,
}

impl AnalyzeReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

pub fn analyze_table(table: &RouteTable) -> AnalyzeReport {
    let mut warnings = Vec::new();
    let mut seen_patterns: HashMap<&str, (String, usize)> = HashMap::new();

    for (slot_index, slot) in table.slots.iter().enumerate() {
        let label = table.slot_label(slot_index);
        if slot.routes.is_empty() {
            warnings.push(Warning::EmptySlot { slot: label.clone() });
        }

        for (route_index, route) in slot.routes.iter().enumerate() {
            match seen_patterns.get(route.pattern.as_str()) {
                Some(first) => warnings.push(Warning::DuplicatePattern {
                    pattern: route.pattern.clone(),
                    first: first.clone(),
                    duplicate: (label.clone(), route_index),
                }),
                None => {
                    seen_patterns.insert(&route.pattern, (label.clone(), route_index));
                }
            }

            let mut names = HashSet::new();
            for param in &route.params {
                if !names.insert(param.as_str()) {
                    warnings.push(Warning::DuplicateParam {
                        view: route.view.clone(),
                        param: param.clone(),
                    });
                }
            }
        }
    }

    if let Some(home_path) = &table.home_path {
        if !home_is_routable(table, home_path) {
            warnings.push(Warning::UnroutableHome {
                home_path: home_path.clone(),
            });
        }
    }

    for warning in &warnings {
        log::warn!("{warning}");
    }

    AnalyzeReport {
        slots: table.slots.len(),
        routes: table.route_count(),
        warnings,
    }
}

/// Routes that fail to compile are skipped here; the builder reports them.
fn home_is_routable(table: &RouteTable, home_path: &str) -> bool {
    let pathname = HashLocation::parse(home_path).pathname;
    table
        .slots
        .iter()
        .flat_map(|slot| slot.routes.iter())
        .filter_map(|route| RouteDefinition::new(&route.pattern, route.params.iter().cloned(), ()).ok())
        .any(|route| route.regex().is_match(&pathname))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_route_table, TableFormat};

    const MEDIA_ROUTES: &str = include_str!("../../../demos/media-routes.toml");

    fn table(text: &str) -> RouteTable {
        parse_route_table(text, TableFormat::Toml).unwrap()
    }

    #[test]
    fn test_demo_table_is_clean() {
        let report = analyze_table(&table(MEDIA_ROUTES));
        assert!(report.is_clean(), "{:?}", report.warnings);
        assert_eq!(report.slots, 4);
        assert_eq!(report.routes, 10);
    }

    #[test]
    fn test_flags_empty_slot_and_duplicate_pattern() {
        let report = analyze_table(&table(
            r#"
            [[slots]]
            name = "main"
            [[slots.routes]]
            view = "search"
            pattern = "/search"
            [[slots.routes]]
            view = "search-again"
            pattern = "/search"

            [[slots]]
            name = "aux"
            "#,
        ));
        assert_eq!(
            report.warnings,
            vec![
                Warning::DuplicatePattern {
                    pattern: "/search".to_string(),
                    first: ("main".to_string(), 0),
                    duplicate: ("main".to_string(), 1),
                },
                Warning::EmptySlot {
                    slot: "aux".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_flags_duplicate_param() {
        let report = analyze_table(&table(
            r#"
            [[slots]]
            [[slots.routes]]
            view = "detail"
            pattern = "/detail/([^/]*)/([^/]*)"
            params = ["id", "id"]
            "#,
        ));
        assert_eq!(
            report.warnings,
            vec![Warning::DuplicateParam {
                view: "detail".to_string(),
                param: "id".to_string()
            }]
        );
        assert_eq!(report.warnings[0].to_string(), "view 'detail' names param 'id' more than once");
    }

    #[test]
    fn test_home_path_checks_pathname_only() {
        let routable = analyze_table(&table(
            r#"
            home-path = "/library?type=movie"
            [[slots]]
            [[slots.routes]]
            view = "library"
            pattern = "/library"
            "#,
        ));
        assert!(routable.is_clean());

        let unroutable = analyze_table(&table(
            r#"
            home-path = "/home"
            [[slots]]
            [[slots.routes]]
            view = "library"
            pattern = "/library"
            "#,
        ));
        assert_eq!(
            unroutable.warnings,
            vec![Warning::UnroutableHome {
                home_path: "/home".to_string()
            }]
        );
    }
}

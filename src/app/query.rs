//! Headless query over a JSON data file

use anyhow::{anyhow, bail, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::grid::{query_page, Columns, FilterState, PaginationState, SortDirection, SortState};
use crate::models::{infer_columns, load_records, DynamicRecord};

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// JSON file holding an array of objects
    #[arg(short, long)]
    pub data: PathBuf,

    /// Case-insensitive text matched against every field
    #[arg(short, long)]
    pub search: Option<String>,

    /// Column filter, repeatable
    #[arg(short, long = "filter", value_name = "KEY=VALUE")]
    pub filters: Vec<String>,

    /// Sort column with optional direction
    #[arg(long, value_name = "KEY[:asc|desc]")]
    pub sort: Option<String>,

    /// 1-based page number
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// Printed result of a query
#[derive(Debug, Serialize)]
pub struct QueryOutput {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
    pub items: Vec<DynamicRecord>,
}

/// `key`, `key:asc` or `key:desc`
pub fn parse_sort(spec: &str) -> Result<SortState> {
    let (key, direction) = match spec.rsplit_once(':') {
        Some((key, dir)) => {
            let direction = match dir.to_lowercase().as_str() {
                "asc" | "ascending" => SortDirection::Ascending,
                "desc" | "descending" => SortDirection::Descending,
                other => bail!("Unknown sort direction '{}'", other),
            };
            (key, direction)
        }
        None => (spec, SortDirection::Ascending),
    };
    if key.is_empty() {
        bail!("Sort needs a column key");
    }
    Ok(SortState::new(key, direction))
}

/// `key=value`; the value may contain further `=` signs
pub fn parse_filter(spec: &str) -> Result<(String, String)> {
    let (key, value) = spec
        .split_once('=')
        .ok_or_else(|| anyhow!("Filter '{}' is not KEY=VALUE", spec))?;
    if key.is_empty() {
        bail!("Filter '{}' has no column key", spec);
    }
    Ok((key.to_string(), value.to_string()))
}

/// Build the filter, dropping constraints on columns the data does not have.
fn build_filter(
    columns: &Columns<DynamicRecord>,
    search: Option<&str>,
    filters: &[(String, String)],
) -> FilterState {
    let mut state = FilterState::new().with_query(search.unwrap_or(""));
    for (key, value) in filters {
        if columns.is_filterable(key) {
            state.set_column(key, value);
        } else {
            tracing::warn!("Ignoring filter on unknown column '{}'", key);
        }
    }
    state
}

/// Run filter, sort and paginate once over `records`.
pub fn run_query(
    records: &[DynamicRecord],
    search: Option<&str>,
    filters: &[(String, String)],
    sort: Option<SortState>,
    page: usize,
    page_size: usize,
) -> Result<QueryOutput> {
    let columns = infer_columns(records)?;
    let filter = build_filter(&columns, search, filters);
    let sort = sort.filter(|s| {
        let known = columns.is_sortable(&s.key);
        if !known {
            tracing::warn!("Ignoring sort on unknown column '{}'", s.key);
        }
        known
    });

    let filtered_len = crate::grid::filter(records, &filter).len();
    let pagination = PaginationState::new(page_size).go_to(page, filtered_len);
    let result = query_page(records, &filter, sort.as_ref(), &pagination);

    Ok(QueryOutput {
        page: result.page_index,
        total_pages: result.total_pages,
        total_items: result.total_items,
        page_size: result.page_size,
        items: result.items,
    })
}

/// Entry point for the `query` subcommand; returns pretty JSON.
pub fn execute(args: &QueryArgs, default_page_size: usize) -> Result<String> {
    let records = load_records(&args.data)?;
    let filters = args
        .filters
        .iter()
        .map(|f| parse_filter(f))
        .collect::<Result<Vec<_>>>()?;
    let sort = args.sort.as_deref().map(parse_sort).transpose()?;

    let output = run_query(
        &records,
        args.search.as_deref(),
        &filters,
        sort,
        args.page,
        args.page_size.unwrap_or(default_page_size),
    )?;
    Ok(serde_json::to_string_pretty(&output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Value;
    use crate::models::parse_records;

    fn people() -> Vec<DynamicRecord> {
        parse_records(
            r#"[
                {"name": "Bob", "email": "b@x.com", "age": "9"},
                {"name": "Alice", "email": "a@x.com", "age": "10"},
                {"name": "Carol", "email": "c@y.org", "age": 31}
            ]"#,
        )
        .unwrap()
    }

    fn names(output: &QueryOutput) -> Vec<String> {
        output
            .items
            .iter()
            .map(|r| r.get("name").cloned().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn parses_sort_specs() {
        assert_eq!(parse_sort("name").unwrap(), SortState::ascending("name"));
        assert_eq!(parse_sort("age:DESC").unwrap(), SortState::descending("age"));
        assert!(parse_sort("age:sideways").is_err());
        assert!(parse_sort(":asc").is_err());
    }

    #[test]
    fn parses_filter_specs() {
        assert_eq!(
            parse_filter("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_filter("novalue").is_err());
        assert!(parse_filter("=x").is_err());
    }

    #[test]
    fn numeric_text_sorts_numerically() {
        let out = run_query(&people(), None, &[], Some(SortState::ascending("age")), 1, 10).unwrap();
        assert_eq!(names(&out), vec!["Bob", "Alice", "Carol"]);
    }

    #[test]
    fn search_and_filters_combine() {
        let filters = vec![("email".to_string(), "x.com".to_string())];
        let out = run_query(&people(), Some("ALI"), &filters, None, 1, 10).unwrap();
        assert_eq!(names(&out), vec!["Alice"]);
        assert_eq!(out.total_items, 1);
    }

    #[test]
    fn unknown_columns_are_ignored() {
        let filters = vec![("phone".to_string(), "555".to_string())];
        let out = run_query(
            &people(),
            None,
            &filters,
            Some(SortState::ascending("phone")),
            1,
            10,
        )
        .unwrap();
        assert_eq!(names(&out), vec!["Bob", "Alice", "Carol"]);
    }

    #[test]
    fn page_is_clamped() {
        let out = run_query(&people(), None, &[], None, 9, 2).unwrap();
        assert_eq!(out.page, 2);
        assert_eq!(out.total_pages, 2);
        assert_eq!(names(&out), vec!["Carol"]);
    }

    #[test]
    fn output_serializes_page_fields() {
        let out = run_query(&people(), Some("bob"), &[], None, 1, 5).unwrap();
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["page"], 1);
        assert_eq!(json["total_items"], 1);
        assert_eq!(json["items"][0]["name"], "Bob");
        assert_eq!(out.items[0].get("age"), Some(&Value::from("9")));
    }
}

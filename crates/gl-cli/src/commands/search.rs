use std::fmt::Write as _;

use gl_core::{
    filter_by_search, filter_by_status, sort_items, GrowRecord, GrowSnapshot, SearchField,
    SortKey, SortOrder, StatusFilter,
};

#[derive(Debug, Clone)]
pub struct SearchArgs {
    pub term: String,
    pub fields: Vec<SearchField>,
    pub status: StatusFilter,
    pub sort: Option<(SortKey, SortOrder)>,
    pub json: bool,
}

impl SearchArgs {
    /// Parse raw command-line values. No `--field` means the default set.
    pub fn parse(
        term: &str,
        fields: &[String],
        status: &str,
        sort: Option<&str>,
        descending: bool,
        json: bool,
    ) -> anyhow::Result<Self> {
        let fields = if fields.is_empty() {
            SearchField::DEFAULT.to_vec()
        } else {
            fields
                .iter()
                .map(|f| f.parse())
                .collect::<Result<Vec<SearchField>, _>>()?
        };
        let order = if descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        let sort = match sort {
            Some(key) => Some((key.parse::<SortKey>()?, order)),
            None if descending => Some((SortKey::default(), order)),
            None => None,
        };
        Ok(Self {
            term: term.to_string(),
            fields,
            status: status.parse()?,
            sort,
            json,
        })
    }
}

/// Run the `search` subcommand: text search, then status filter, then sort.
pub fn run(snapshot: &GrowSnapshot, args: &SearchArgs) -> anyhow::Result<String> {
    let found = filter_by_search(snapshot.items(), &args.term, &args.fields);
    let mut hits = filter_by_status(found, args.status);
    if let Some((key, order)) = args.sort {
        hits = sort_items(hits, key, order);
    }
    tracing::debug!(term = %args.term, status = %args.status, hits = hits.len(), "search");

    if args.json {
        let records: Vec<GrowRecord> = hits.iter().map(|item| GrowRecord::from(*item)).collect();
        return Ok(serde_json::to_string_pretty(&records)? + "\n");
    }

    let mut out = String::new();
    writeln!(
        out,
        "{} of {} grows match {:?} (status {})",
        hits.len(),
        snapshot.len(),
        args.term.trim(),
        args.status
    )?;
    for item in hits {
        writeln!(
            out,
            "{} {:<10} {:<24} {:>3}%  {} .. {}  {}",
            item.status.glyph(),
            item.id,
            item.species_name,
            item.progress,
            item.start_date.format("%Y-%m-%d"),
            item.end_date.format("%Y-%m-%d"),
            item.location.path(),
        )?;
    }
    Ok(out)
}

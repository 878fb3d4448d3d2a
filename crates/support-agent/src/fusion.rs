//! Result fusion: tag hits with their collection, merge, and rank.
//!
//! No cross-collection deduplication is performed — the same concept
//! present in both collections yields two entries.

use crate::types::{ResultType, SearchHit, SourceRef};

/// Tag each hit's result type, concatenate, and stable-sort by score
/// descending. Ties keep their original retrieval order, knowledge
/// base before tickets.
pub fn combine(kb_hits: Vec<SearchHit>, ticket_hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut combined = Vec::with_capacity(kb_hits.len() + ticket_hits.len());

    for mut hit in kb_hits {
        hit.source.result_type = Some(ResultType::KnowledgeBase);
        combined.push(hit);
    }
    for mut hit in ticket_hits {
        hit.source.result_type = Some(ResultType::SupportTicket);
        combined.push(hit);
    }

    // Vec::sort_by is stable, which the tie-order contract relies on.
    combined.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    combined
}

/// Render fused hits as user-facing source references. Callers pass
/// the top slice of the fused list (the chat reply shows two).
pub fn format_sources(hits: &[SearchHit]) -> Vec<SourceRef> {
    hits.iter()
        .filter_map(|hit| {
            let source = &hit.source;
            let relevance = format!("{:.2}", hit.score);
            let category = source.category.clone().unwrap_or_else(|| "general".into());
            match source.result_type {
                Some(ResultType::KnowledgeBase) => Some(SourceRef {
                    title: source
                        .title
                        .clone()
                        .unwrap_or_else(|| "Knowledge Base Article".into()),
                    source_type: "Knowledge Base".into(),
                    category,
                    relevance,
                }),
                Some(ResultType::SupportTicket) => {
                    let problem = source.problem.as_deref().unwrap_or("Unknown");
                    let truncated: String = problem.chars().take(50).collect();
                    Some(SourceRef {
                        title: format!("Similar Issue: {truncated}..."),
                        source_type: "Support Ticket".into(),
                        category,
                        relevance,
                    })
                }
                None => None,
            }
        })
        .collect()
}

use std::path::Path;

use serde_json::json;

/// A CORD-19 shaped record with a single abstract and body paragraph.
pub fn paper_json(paper_id: &str, abstract_text: &str, body: &str) -> String {
    json!({
        "paper_id": paper_id,
        "metadata": {"title": format!("Paper {paper_id}"), "authors": []},
        "abstract": [{"text": abstract_text, "section": "Abstract"}],
        "body_text": [{"text": body, "section": "Body"}],
        "bib_entries": {},
    })
    .to_string()
}

pub fn write_paper(
    dir: &Path,
    file: &str,
    paper_id: &str,
    abstract_text: &str,
    body: &str,
) {
    std::fs::write(dir.join(file), paper_json(paper_id, abstract_text, body))
        .unwrap();
}

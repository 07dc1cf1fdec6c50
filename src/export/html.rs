//! Human-readable HTML report: a summary of edge counts by kind, plus the
//! full edge list as a table. Not a bit-exact sink like [`super::json`];
//! free to reformat.

use build_html::{escape_html, Container, ContainerType, Html, HtmlContainer, HtmlElement, HtmlPage, HtmlTag};

use crate::graph::{builder::BuildReport, Graph};

pub fn export(graph: &Graph, report: &BuildReport) -> String {
    let summary_list = graph.summary_by_kind().into_iter().fold(
        Container::new(ContainerType::UnorderedList),
        |list, (kind, count)| list.with_raw(format!("<li>{}: {count}</li>", escape_html(kind.as_str()))),
    );

    let edges_table = super::sorted_edges(graph).into_iter().fold(
        HtmlElement::new(HtmlTag::Table).with_attribute("class", "edges").with_raw(
            "<tr><th>Source</th><th>Target</th><th>Kind</th><th>Confidence</th><th>Reason</th></tr>",
        ),
        |table, dep| {
            table.with_raw(format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.2}</td><td>{}</td></tr>",
                escape_html(&dep.source),
                escape_html(&dep.target),
                escape_html(dep.kind.as_str()),
                dep.confidence,
                escape_html(dep.reason.as_deref().unwrap_or("")),
            ))
        },
    );

    HtmlPage::new()
        .with_title("Dependency graph report")
        .with_header(1, "Dependency graph report")
        .with_container(
            Container::new(ContainerType::Div).with_attributes([("class", "summary")]).with_paragraph(format!(
                "{} operations, {} candidate dependencies, {} admitted, {} rejected for cycles, {} warnings",
                report.operation_count,
                report.candidate_count,
                report.admitted_count,
                report.rejected_cycle_count,
                report.warnings.len(),
            )),
        )
        .with_header(2, "Edges by kind")
        .with_container(summary_list)
        .with_header(2, "Edges")
        .with_html(edges_table)
        .to_html_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        method::Method,
        model::{Dependency, DependencyKind, Operation},
    };

    #[test]
    fn report_mentions_admitted_edges() {
        let mut graph = Graph::new(vec![
            Operation::new("a", Method::Post, "/a"),
            Operation::new("b", Method::Get, "/b"),
        ]);
        graph.add_dependency_if_acyclic(Dependency::new("a", "b", DependencyKind::Crud, 0.9));
        let report = BuildReport { operation_count: 2, candidate_count: 1, admitted_count: 1, ..Default::default() };
        let html = export(&graph, &report);
        assert!(html.contains("crud"));
        assert!(html.contains("1 admitted"));
    }
}

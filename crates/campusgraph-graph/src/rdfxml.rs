//! RDF/XML writer backed by `quick-xml`.
//!
//! Each subject becomes one `rdf:Description`; predicates are written as
//! qualified element names, which requires them to sit in the graph
//! namespace or one of the standard vocabularies.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use campusgraph_core::types::{OWL_NS, RDFS_NS, RDF_NS};
use campusgraph_core::{Iri, Namespace, Term};

use crate::store::{Graph, GraphError, Result};

pub fn write<W: Write>(graph: &Graph, w: W) -> Result<()> {
    let ns = graph.namespace();
    let mut writer = Writer::new_with_indent(w, b' ', 2);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("rdf:RDF");
    root.push_attribute(("xmlns:rdf", RDF_NS));
    root.push_attribute(("xmlns:rdfs", RDFS_NS));
    root.push_attribute(("xmlns:owl", OWL_NS));
    root.push_attribute(("xmlns:ns", ns.base()));
    emit(&mut writer, Event::Start(root))?;

    let mut current: Option<&Iri> = None;
    for triple in graph.iter() {
        if current != Some(&triple.subject) {
            if current.is_some() {
                emit(&mut writer, Event::End(BytesEnd::new("rdf:Description")))?;
            }
            let mut description = BytesStart::new("rdf:Description");
            description.push_attribute(("rdf:about", triple.subject.as_str()));
            emit(&mut writer, Event::Start(description))?;
            current = Some(&triple.subject);
        }

        let name = qualified_name(&triple.predicate, ns)?;
        match &triple.object {
            Term::Iri(object) => {
                let mut element = BytesStart::new(name.as_str());
                element.push_attribute(("rdf:resource", object.as_str()));
                emit(&mut writer, Event::Empty(element))?;
            }
            Term::Literal(lit) => {
                let datatype = lit.datatype.iri();
                let mut element = BytesStart::new(name.as_str());
                element.push_attribute(("rdf:datatype", datatype.as_str()));
                emit(&mut writer, Event::Start(element))?;
                emit(&mut writer, Event::Text(BytesText::new(&lit.lexical)))?;
                emit(&mut writer, Event::End(BytesEnd::new(name.as_str())))?;
            }
        }
    }
    if current.is_some() {
        emit(&mut writer, Event::End(BytesEnd::new("rdf:Description")))?;
    }

    emit(&mut writer, Event::End(BytesEnd::new("rdf:RDF")))?;
    let mut inner = writer.into_inner();
    inner.write_all(b"\n")?;
    inner.flush()?;
    Ok(())
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| GraphError::Serialize(format!("RDF/XML: {e}")))
}

fn qualified_name(predicate: &Iri, ns: &Namespace) -> Result<String> {
    let candidates = [
        ("ns", ns.base()),
        ("rdf", RDF_NS),
        ("rdfs", RDFS_NS),
        ("owl", OWL_NS),
    ];
    for (prefix, base) in candidates {
        if let Some(local) = predicate.as_str().strip_prefix(base) {
            if is_ncname(local) {
                return Ok(format!("{prefix}:{local}"));
            }
        }
    }
    Err(GraphError::Serialize(format!(
        "predicate {predicate} has no XML-safe qualified name"
    )))
}

fn is_ncname(local: &str) -> bool {
    let mut chars = local.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

//! Turtle writer.
//!
//! Triples are grouped by subject in sorted order, `rdf:type` first and
//! written as `a`. IRIs in the graph namespace and the standard
//! vocabularies are compacted to prefixed names.
//!
//! ```turtle
//! @prefix : <http://example.org/uni/> .
//!
//! :course_DD2421 a :Course ;
//!     :courseCode "DD2421"^^xsd:string .
//! ```

use std::io::Write;

use campusgraph_core::types::{OWL_NS, RDFS_NS, RDF_NS, XSD_NS};
use campusgraph_core::{Iri, Literal, Namespace, Term, Triple};

use crate::store::{Graph, Result};

const STANDARD_PREFIXES: [(&str, &str); 4] = [
    ("rdf", RDF_NS),
    ("rdfs", RDFS_NS),
    ("xsd", XSD_NS),
    ("owl", OWL_NS),
];

/// Write the graph as Turtle. A preamble (typically the ontology
/// document) is copied verbatim ahead of the data.
pub fn write<W: Write>(graph: &Graph, mut w: W, preamble: Option<&str>) -> Result<()> {
    let ns = graph.namespace();

    if let Some(text) = preamble {
        w.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            writeln!(w)?;
        }
        writeln!(w)?;
    }

    writeln!(w, "@prefix : <{}> .", ns.base())?;
    for (prefix, base) in STANDARD_PREFIXES {
        writeln!(w, "@prefix {prefix}: <{base}> .")?;
    }

    let rdf_type = Iri::rdf_type();
    let mut group: Vec<&Triple> = Vec::new();

    for triple in graph.iter() {
        if group.first().is_some_and(|t| t.subject != triple.subject) {
            write_group(&mut w, ns, &rdf_type, &group)?;
            group.clear();
        }
        group.push(triple);
    }
    if !group.is_empty() {
        write_group(&mut w, ns, &rdf_type, &group)?;
    }

    w.flush()?;
    Ok(())
}

fn write_group<W: Write>(
    w: &mut W,
    ns: &Namespace,
    rdf_type: &Iri,
    group: &[&Triple],
) -> Result<()> {
    let (types, others): (Vec<&Triple>, Vec<&Triple>) =
        group.iter().copied().partition(|t| &t.predicate == rdf_type);

    writeln!(w)?;
    write!(w, "{}", format_iri(&group[0].subject, ns))?;

    let mut lines = Vec::with_capacity(others.len() + 1);
    if !types.is_empty() {
        let objects: Vec<String> = types.iter().map(|t| format_term(&t.object, ns)).collect();
        lines.push(format!("a {}", objects.join(", ")));
    }
    for triple in others {
        lines.push(format!(
            "{} {}",
            format_iri(&triple.predicate, ns),
            format_term(&triple.object, ns)
        ));
    }

    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            write!(w, " {line}")?;
        } else {
            write!(w, " ;\n    {line}")?;
        }
    }
    writeln!(w, " .")?;
    Ok(())
}

fn format_term(term: &Term, ns: &Namespace) -> String {
    match term {
        Term::Iri(iri) => format_iri(iri, ns),
        Term::Literal(lit) => format_literal(lit),
    }
}

fn format_literal(lit: &Literal) -> String {
    format!(
        "\"{}\"^^xsd:{}",
        escape_string(&lit.lexical),
        lit.datatype.local_name()
    )
}

/// Compact an IRI to a prefixed name when the local part allows it.
pub(crate) fn format_iri(iri: &Iri, ns: &Namespace) -> String {
    if let Some(local) = ns.local(iri) {
        if is_prefixable_local(local) {
            return format!(":{local}");
        }
    }
    for (prefix, base) in STANDARD_PREFIXES {
        if let Some(local) = iri.as_str().strip_prefix(base) {
            if is_prefixable_local(local) {
                return format!("{prefix}:{local}");
            }
        }
    }
    format!("<{}>", iri.as_str())
}

/// A conservative subset of Turtle's PN_LOCAL: ASCII letters, digits,
/// `_`, `-` and `%XX` escapes, not starting with `-`.
fn is_prefixable_local(local: &str) -> bool {
    let bytes = local.as_bytes();
    if bytes.is_empty() || bytes[0] == b'-' {
        return false;
    }
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                if i + 2 >= bytes.len()
                    || !bytes[i + 1].is_ascii_hexdigit()
                    || !bytes[i + 2].is_ascii_hexdigit()
                {
                    return false;
                }
                i += 3;
            }
            b if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' => i += 1,
            _ => return false,
        }
    }
    true
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

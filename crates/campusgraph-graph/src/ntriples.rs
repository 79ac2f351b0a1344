//! N-Triples writer: one absolute triple per line, sorted.

use std::io::Write;

use campusgraph_core::{Literal, Term};

use crate::store::{Graph, Result};

pub fn write<W: Write>(graph: &Graph, mut w: W) -> Result<()> {
    for triple in graph.iter() {
        writeln!(
            w,
            "<{}> <{}> {} .",
            triple.subject.as_str(),
            triple.predicate.as_str(),
            format_object(&triple.object)
        )?;
    }
    w.flush()?;
    Ok(())
}

fn format_object(term: &Term) -> String {
    match term {
        Term::Iri(iri) => format!("<{}>", iri.as_str()),
        Term::Literal(lit) => format_literal(lit),
    }
}

fn format_literal(lit: &Literal) -> String {
    let mut out = String::with_capacity(lit.lexical.len() + 2);
    out.push('"');
    for c in lit.lexical.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out.push_str(&format!("^^<{}>", lit.datatype.iri()));
    out
}

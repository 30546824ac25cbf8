//! IGES 5.3 wireframe export.
//!
//! Every edge of the solid becomes one curve entity:
//! - straight edges → type 110 (line)
//! - circular edges → type 100 (circular arc) in its own definition plane,
//!   placed in model space by a type 124 transformation matrix
//!
//! The file uses fixed 80-column records: Start (S), Global (G),
//! Directory Entry (D, two records per entity), Parameter Data (P) and
//! Terminate (T).

use super::real;
use crate::curve::{circle_frame, Curve3};
use crate::topo::*;
use std::io::{self, Write};

/// Data columns of a Parameter Data record; columns 66-72 hold the entity's DE pointer.
const PARAM_WIDTH: usize = 64;
const GLOBAL_WIDTH: usize = 72;

struct Entity {
    kind: u32,
    params: Vec<String>,
    /// Directory sequence number of the transformation matrix, or 0.
    transform: usize,
}

/// Write every edge of a solid as IGES wireframe geometry.
pub fn write_iges<W: Write>(store: &TopoStore, solid_id: SolidId, name: &str, writer: &mut W) -> io::Result<()> {
    let mut entities: Vec<Entity> = Vec::new();

    for edge_id in store.solid_edges(solid_id) {
        let edge = store.edge(edge_id);
        match &edge.curve {
            Curve3::Line { .. } => {
                let a = edge.curve.evaluate(edge.t_start);
                let b = edge.curve.evaluate(edge.t_end);
                entities.push(Entity {
                    kind: 110,
                    params: [a.x, a.y, a.z, b.x, b.y, b.z].map(real).to_vec(),
                    transform: 0,
                });
            }
            Curve3::Circle {
                center,
                axis,
                ref_dir,
                radius,
            } => {
                // Definition plane: the circle's own frame, so the arc is
                // counter-clockwise from t_start to t_end about +Z.
                let (x, y) = circle_frame(axis, ref_dir);
                let z = axis.normalize();
                entities.push(Entity {
                    kind: 124,
                    params: [
                        x.x, y.x, z.x, center.x, x.y, y.y, z.y, center.y, x.z, y.z, z.z, center.z,
                    ]
                    .map(real)
                    .to_vec(),
                    transform: 0,
                });
                let matrix_de = 2 * entities.len() - 1;

                let (s0, s1) = edge.t_start.sin_cos();
                let (e0, e1) = edge.t_end.sin_cos();
                entities.push(Entity {
                    kind: 100,
                    params: [0.0, 0.0, 0.0, radius * s1, radius * s0, radius * e1, radius * e0]
                        .map(real)
                        .to_vec(),
                    transform: matrix_de,
                });
            }
        }
    }

    let mut out = RecordWriter::new(writer);

    out.record(&format!("{name} wireframe written by shapegen"), 'S')?;

    let global = [
        hollerith(","),
        hollerith(";"),
        hollerith(name),
        hollerith(&format!("{name}.igs")),
        hollerith("shapegen"),
        hollerith(env!("CARGO_PKG_VERSION")),
        "32".into(),
        "38".into(),
        "6".into(),
        "308".into(),
        "15".into(),
        hollerith(name),
        "1.".into(),
        "2".into(),
        hollerith("MM"),
        "1".into(),
        "1.".into(),
        hollerith("20000101.000000"),
        "1.E-07".into(),
        "0.".into(),
        String::new(),
        String::new(),
        "11".into(),
        "0".into(),
    ];
    for line in pack(&global, GLOBAL_WIDTH) {
        out.record(&line, 'G')?;
    }

    // Parameter lines per entity, to know each entity's P pointer and line count.
    let param_lines: Vec<Vec<String>> = entities
        .iter()
        .map(|e| {
            let mut tokens = vec![e.kind.to_string()];
            tokens.extend(e.params.iter().cloned());
            pack(&tokens, PARAM_WIDTH)
        })
        .collect();

    let mut p_pointer = 1;
    for (entity, lines) in entities.iter().zip(&param_lines) {
        // Transformation matrices are physically dependent on their arcs.
        let status = if entity.kind == 124 { "00010000" } else { "00000000" };
        let first = format!(
            "{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}",
            entity.kind, p_pointer, 0, 1, 0, 0, entity.transform, 0, status
        );
        out.record(&first, 'D')?;
        let second = format!(
            "{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}{:>8}",
            entity.kind,
            0,
            0,
            lines.len(),
            0,
            "",
            "",
            "",
            0
        );
        out.record(&second, 'D')?;
        p_pointer += lines.len();
    }

    for (i, lines) in param_lines.iter().enumerate() {
        let de = 2 * i + 1;
        for line in lines {
            out.record(&format!("{line:<PARAM_WIDTH$} {de:>7}"), 'P')?;
        }
    }

    let terminate = format!(
        "S{:>7}G{:>7}D{:>7}P{:>7}",
        out.count('S'),
        out.count('G'),
        out.count('D'),
        out.count('P')
    );
    out.record(&terminate, 'T')?;
    Ok(())
}

/// IGES string constant: `nH` followed by the characters.
fn hollerith(s: &str) -> String {
    format!("{}H{s}", s.chars().count())
}

/// Join tokens with `,`, end with `;`, and break into lines of at most
/// `width` columns without splitting a token.
fn pack(tokens: &[String], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for (i, token) in tokens.iter().enumerate() {
        let delim = if i + 1 == tokens.len() { ';' } else { ',' };
        let piece = format!("{token}{delim}");
        if !line.is_empty() && line.len() + piece.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        line.push_str(&piece);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Writes 80-column records and keeps a sequence counter per section.
struct RecordWriter<'a, W: Write> {
    writer: &'a mut W,
    counts: [(char, usize); 5],
}

impl<'a, W: Write> RecordWriter<'a, W> {
    fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            counts: [('S', 0), ('G', 0), ('D', 0), ('P', 0), ('T', 0)],
        }
    }

    fn count(&self, section: char) -> usize {
        self.counts
            .iter()
            .find(|(s, _)| *s == section)
            .map_or(0, |(_, n)| *n)
    }

    fn record(&mut self, data: &str, section: char) -> io::Result<()> {
        let Some(slot) = self.counts.iter_mut().find(|(s, _)| *s == section) else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unknown IGES section {section}"),
            ));
        };
        slot.1 += 1;
        let data: String = data.chars().take(GLOBAL_WIDTH).collect();
        writeln!(self.writer, "{data:<GLOBAL_WIDTH$}{section}{:>7}", slot.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{make_box, make_cylinder};

    fn iges_text(build: impl FnOnce(&mut TopoStore) -> SolidId) -> String {
        let mut store = TopoStore::new();
        let solid = build(&mut store);
        let mut buf = Vec::new();
        write_iges(&store, solid, "part", &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn entity_types(text: &str) -> Vec<u32> {
        text.lines()
            .filter(|l| l.as_bytes().get(72) == Some(&b'D'))
            .step_by(2)
            .map(|l| l[..8].trim().parse().unwrap())
            .collect()
    }

    #[test]
    fn every_record_is_80_columns() {
        let text = iges_text(|s| make_cylinder(s, 2.0, 3.0).unwrap());
        for line in text.lines() {
            assert_eq!(line.len(), 80, "{line:?}");
        }
        assert!(text.lines().last().unwrap()[72..].starts_with('T'));
    }

    #[test]
    fn box_is_twelve_lines() {
        let text = iges_text(|s| make_box(s, 1.0, 1.0, 1.0).unwrap());
        assert_eq!(entity_types(&text), vec![110; 12]);
    }

    #[test]
    fn cylinder_arcs_carry_transforms() {
        let text = iges_text(|s| make_cylinder(s, 2.0, 3.0).unwrap());
        let types = entity_types(&text);
        assert_eq!(types.iter().filter(|&&t| t == 100).count(), 4);
        assert_eq!(types.iter().filter(|&&t| t == 124).count(), 4);
        assert_eq!(types.iter().filter(|&&t| t == 110).count(), 2);

        // Each arc's transformation pointer is the DE of the matrix just before it.
        let de_lines: Vec<&str> = text
            .lines()
            .filter(|l| l.as_bytes().get(72) == Some(&b'D'))
            .collect();
        for (i, pair) in de_lines.chunks(2).enumerate() {
            if pair[0][..8].trim() == "100" {
                let pointer: usize = pair[0][48..56].trim().parse().unwrap();
                assert_eq!(pointer, 2 * i - 1);
            }
        }
    }

    #[test]
    fn terminate_counts_match_sections() {
        let text = iges_text(|s| make_box(s, 1.0, 1.0, 1.0).unwrap());
        let last = text.lines().last().unwrap();
        let d_count = text.lines().filter(|l| l.as_bytes().get(72) == Some(&b'D')).count();
        assert_eq!(last[16..24].trim_start_matches('D').trim(), d_count.to_string());
    }

    #[test]
    fn pack_keeps_tokens_whole() {
        let tokens: Vec<String> = (0..30).map(|i| format!("{i}.5")).collect();
        let lines = pack(&tokens, 20);
        assert!(lines.iter().all(|l| l.len() <= 20));
        assert!(lines.last().unwrap().ends_with(';'));
        assert_eq!(lines.concat().matches(',').count(), 29);
    }
}

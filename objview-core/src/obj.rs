//! Wavefront OBJ parser
//!
//! Understands vertex (`v`), face (`f`), line (`l`) and grouping (`o`, `g`)
//! records. Every other record type is skipped.
use nom::{
    bytes::complete::take_till,
    character::complete::{char, i64 as integer, space0, space1},
    combinator::{eof, opt},
    multi::{many0, many1},
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use tracing::{debug, trace};

use crate::error::ParseError;
use crate::mesh::{Figure, Scene, Vertex};

/// Parse OBJ text into a validated scene
pub fn parse(input: &str) -> Result<Scene, ParseError> {
    let mut builder = SceneBuilder::default();

    for (number, line) in logical_lines(input) {
        builder.record(number, &line)?;
    }

    if builder.vertices.is_empty() {
        return Err(ParseError::EmptyScene);
    }

    debug!(
        vertices = builder.vertices.len(),
        figures = builder.figures.len(),
        skipped = builder.skipped,
        "parsed OBJ input"
    );

    Scene::new(builder.vertices, builder.figures)
}

#[derive(Default)]
struct SceneBuilder {
    vertices: Vec<Vertex>,
    figures: Vec<Figure>,
    group: Option<String>,
    skipped: usize,
}

impl SceneBuilder {
    fn record(&mut self, line: usize, text: &str) -> Result<(), ParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let (keyword, rest) = match text.find(|c: char| c.is_whitespace()) {
            Some(pos) => text.split_at(pos),
            None => (text, ""),
        };

        match keyword {
            "v" => {
                let (_, (x, y, z)) =
                    parse_vertex(rest).map_err(|_| malformed(line, "expected `v x y z [w]`"))?;
                if !(x.is_finite() && y.is_finite() && z.is_finite()) {
                    return Err(malformed(line, "vertex coordinates must be finite"));
                }
                self.vertices.push(Vertex::new(x, y, z));
            }
            "f" => {
                let (_, refs) =
                    parse_references(rest).map_err(|_| malformed(line, "expected `f i j k ...`"))?;
                if refs.len() < 3 {
                    return Err(malformed(line, "a face needs at least 3 vertices"));
                }
                let indices = self.resolve(line, &refs)?;
                self.figures
                    .push(Figure::polygon(indices).with_group(self.group.clone()));
            }
            "l" => {
                let (_, refs) =
                    parse_references(rest).map_err(|_| malformed(line, "expected `l i j ...`"))?;
                if refs.len() < 2 {
                    return Err(malformed(line, "a line needs at least 2 vertices"));
                }
                let indices = self.resolve(line, &refs)?;
                self.figures
                    .push(Figure::polyline(indices).with_group(self.group.clone()));
            }
            "o" | "g" => {
                let name = rest.trim();
                self.group = (!name.is_empty()).then(|| name.to_string());
            }
            other => {
                trace!(line, keyword = other, "skipping unsupported record");
                self.skipped += 1;
            }
        }

        Ok(())
    }

    /// Convert 1-based (or negative, relative) references to table indices
    fn resolve(&self, line: usize, refs: &[i64]) -> Result<Vec<usize>, ParseError> {
        let len = self.vertices.len() as i64;
        refs.iter()
            .map(|&r| {
                let index = match r {
                    0 => return Err(malformed(line, "vertex index 0 is not valid")),
                    r if r > 0 => r - 1,
                    r => len + r,
                };
                if index < 0 || index >= len {
                    return Err(ParseError::InvalidReference { line, index: r });
                }
                Ok(index as usize)
            })
            .collect()
    }
}

fn malformed(line: usize, reason: &str) -> ParseError {
    ParseError::MalformedRecord {
        line,
        reason: reason.to_string(),
    }
}

/// Strip comments and join `\`-continued lines, yielding each logical line
/// with its first line number
///
/// A `\` inside a comment does not continue the line.
fn logical_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (i, raw) in input.lines().enumerate() {
        let number = i + 1;
        let raw = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let (start, mut text) = pending.take().unwrap_or((number, String::new()));
        match raw.trim_end().strip_suffix('\\') {
            Some(head) => {
                text.push_str(head);
                text.push(' ');
                pending = Some((start, text));
            }
            None => {
                text.push_str(raw);
                lines.push((start, text));
            }
        }
    }
    if let Some(last) = pending {
        lines.push(last);
    }

    lines
}

fn parse_vertex(input: &str) -> IResult<&str, (f64, f64, f64)> {
    let (input, (x, y, z)) = tuple((
        preceded(space1, double),
        preceded(space1, double),
        preceded(space1, double),
    ))(input)?;
    // Optional `w` or per-vertex colors
    let (input, _) = many0(preceded(space1, double))(input)?;
    let (input, _) = terminated(space0, eof)(input)?;
    Ok((input, (x, y, z)))
}

/// Position indices of `i`, `i/t`, `i//n` or `i/t/n` elements
fn parse_references(input: &str) -> IResult<&str, Vec<i64>> {
    let (input, refs) = many1(preceded(space1, parse_reference))(input)?;
    let (input, _) = terminated(space0, eof)(input)?;
    Ok((input, refs))
}

fn parse_reference(input: &str) -> IResult<&str, i64> {
    let (input, index) = integer(input)?;
    let (input, _) = opt(preceded(char('/'), take_till(|c: char| c.is_whitespace())))(input)?;
    Ok((input, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use crate::mesh::FigureKind;

    const TETRA: &str = "\
# tetrahedron
v 0 0 0
v 2 0 0
v 0 2 0
v 0 0 2

f 1 2 3
f 1 2 4
f 1 3 4
f 2 3 4
";

    #[test]
    fn test_parse_tetrahedron() {
        let scene = parse(TETRA).unwrap();
        assert_eq!(scene.vertices().len(), 4);
        assert_eq!(scene.figures().len(), 4);
        assert_eq!(scene.vertices()[1].position(), Point3::new(2.0, 0.0, 0.0));
        assert_eq!(scene.figures()[0].indices, vec![0, 1, 2]);
        assert_eq!(scene.figures()[3].kind, FigureKind::Polygon);
    }

    #[test]
    fn test_out_of_range_reference() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 99\n";
        assert_eq!(
            parse(input),
            Err(ParseError::InvalidReference { line: 5, index: 99 })
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), Err(ParseError::EmptyScene));
        assert_eq!(parse("# nothing\n\n   \n"), Err(ParseError::EmptyScene));
    }

    #[test]
    fn test_faces_without_vertices_fail_on_reference() {
        assert_eq!(
            parse("f 1 2 3\n"),
            Err(ParseError::InvalidReference { line: 1, index: 1 })
        );
    }

    #[test]
    fn test_negative_indices_resolve_at_reference_time() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\nv 5 5 5\nl -1 -2\n";
        let scene = parse(input).unwrap();
        assert_eq!(scene.figures()[0].indices, vec![0, 1, 2]);
        assert_eq!(scene.figures()[1].indices, vec![3, 2]);
        assert_eq!(scene.figures()[1].kind, FigureKind::Polyline);
    }

    #[test]
    fn test_negative_index_before_start() {
        let input = "v 0 0 0\nv 1 0 0\nl -3 -1\n";
        assert_eq!(
            parse(input),
            Err(ParseError::InvalidReference { line: 3, index: -3 })
        );
    }

    #[test]
    fn test_face_elements_with_texture_and_normal() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 3/1/1\nf 1//1 2//1 3//1\n";
        let scene = parse(input).unwrap();
        assert_eq!(scene.figures().len(), 2);
        assert_eq!(scene.figures()[1].indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_unknown_records_are_skipped() {
        let input = "mtllib cube.mtl\nv 0 0 0\nusemtl red\ns off\nv 1 1 1\nl 1 2\n";
        let scene = parse(input).unwrap();
        assert_eq!(scene.vertices().len(), 2);
        assert_eq!(scene.figures().len(), 1);
    }

    #[test]
    fn test_groups_are_attached_to_figures() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 1 0\no first\nf 1 2 3\ng second part\nl 1 2\ng\nl 2 3\n";
        let scene = parse(input).unwrap();
        assert_eq!(scene.figures()[0].group.as_deref(), Some("first"));
        assert_eq!(scene.figures()[1].group.as_deref(), Some("second part"));
        assert_eq!(scene.figures()[2].group, None);
    }

    #[test]
    fn test_malformed_vertex() {
        let result = parse("v 1 2\n");
        assert!(matches!(
            result,
            Err(ParseError::MalformedRecord { line: 1, .. })
        ));
        assert!(matches!(
            parse("v 1 2 abc\n"),
            Err(ParseError::MalformedRecord { line: 1, .. })
        ));
    }

    #[test]
    fn test_short_face_and_zero_index() {
        let base = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";
        assert!(matches!(
            parse(&format!("{base}f 1 2\n")),
            Err(ParseError::MalformedRecord { line: 4, .. })
        ));
        assert!(matches!(
            parse(&format!("{base}f 0 1 2\n")),
            Err(ParseError::MalformedRecord { line: 4, .. })
        ));
    }

    #[test]
    fn test_whitespace_tolerance() {
        let input = "  v\t1.5  -2e0 3 1.0\r\n\r\nv 0 0 0   # origin\r\nv 1 1 1\r\n\tf 1 2 3  \r\n";
        let scene = parse(input).unwrap();
        assert_eq!(scene.vertices()[0].position(), Point3::new(1.5, -2.0, 3.0));
        assert_eq!(scene.figures().len(), 1);
    }

    #[test]
    fn test_line_continuation() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 2 \\\n  3 4\nf 1 2 99\n";
        assert_eq!(
            parse(input),
            Err(ParseError::InvalidReference { line: 7, index: 99 })
        );
        let scene = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 \\\n2 3\n").unwrap();
        assert_eq!(scene.figures()[0].indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_backslash_in_comment_does_not_continue() {
        let scene = parse("v 0 0 0 # origin \\\nv 1 1 1\n# note \\\nv 2 2 2\n").unwrap();
        assert_eq!(scene.vertices().len(), 3);
        assert_eq!(scene.vertices()[2].position(), Point3::new(2.0, 2.0, 2.0));
    }
}

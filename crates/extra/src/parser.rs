use path::{
    math::{point, Point},
    Builder, FillId, FillStyles, Path, StrokeId,
};

extern crate thiserror;

use self::thiserror::Error;

#[non_exhaustive]
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error("Line {line} Column {column}: Expected number, got {src:?}.")]
    Number { src: String, line: i32, column: i32 },
    #[error("Line {line} Column {column}: Expected a non-negative integer id, got {src:?}.")]
    Id { src: String, line: i32, column: i32 },
    #[error("Line {line} Column {column}: Invalid command {command:?}.")]
    Command {
        command: char,
        line: i32,
        column: i32,
    },
    #[error("Line {line} Column {column}: Expected move-to command, got {command:?}.")]
    MissingMoveTo {
        command: char,
        line: i32,
        column: i32,
    },
}

#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct ParserOptions {
    /// Optionally stop parsing when encountering a provided special character.
    pub stop_at: Option<char>,
}

impl ParserOptions {
    pub const DEFAULT: ParserOptions = ParserOptions { stop_at: None };
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// A buffered iterator of characters keeping track of line and column.
pub struct Source<Iter> {
    src: Iter,
    current: char,
    line: i32,
    col: i32,
    finished: bool,
}

impl<Iter: Iterator<Item = char>> Source<Iter> {
    pub fn new<IntoIter>(src: IntoIter) -> Self
    where
        IntoIter: IntoIterator<IntoIter = Iter>,
    {
        Self::with_position(0, 0, src)
    }

    pub fn with_position<IntoIter>(line: i32, column: i32, src: IntoIter) -> Self
    where
        IntoIter: IntoIterator<IntoIter = Iter>,
    {
        let mut src = src.into_iter();

        let (current, finished) = match src.next() {
            Some(c) => (c, false),
            None => (' ', true),
        };

        let line = line + if current == '\n' { 1 } else { 0 };

        Source {
            current,
            finished,
            src,
            line,
            col: column,
        }
    }

    fn skip_whitespace(&mut self) {
        while !self.finished && (self.current.is_whitespace() || self.current == ',') {
            self.advance_one();
        }
    }

    fn advance_one(&mut self) {
        if self.finished {
            return;
        }
        match self.src.next() {
            Some('\n') => {
                self.current = '\n';
                self.line += 1;
                self.col = -1;
            }
            Some(c) => {
                self.current = c;
                self.col += 1;
            }
            None => {
                self.current = '~';
                self.finished = true;
            }
        }
    }
}

/// A context object for parsing the filled path syntax.
///
/// # Syntax
///
/// The syntax is the subset of the SVG path syntax that only produces lines
/// and quadratic bézier curves (`M`, `L`, `H`, `V`, `Q`, `T`, `Z` and their
/// relative variants), plus two commands that describe the fill regions:
///
/// - `F <left> <right>` sets the fill ids on the left and right side of the
///   segments that follow,
/// - `S <stroke>` sets the stroke id of the segments that follow.
///
/// For example `F 1 0 M 0 0 L 0 2 Q -1 3 -2 2 L -2 0 Z` reads as follows:
///
/// - the interior of the segments that follow belongs to fill `1` on their left side,
/// - begin at [0, 0],
/// - line to [0, 2],
/// - quadratic bézier curve ending at [-2, 2], with control point [-1, 3],
/// - line to [-2, 0],
/// - close the sub-path.
#[derive(Debug, Default)]
pub struct PathParser {
    float_buffer: String,
    stop_at: Option<char>,
    current_position: Point,
    need_end: bool,
}

impl PathParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse<Iter>(
        &mut self,
        options: &ParserOptions,
        src: &mut Source<Iter>,
        output: &mut Builder,
    ) -> Result<(), ParseError>
    where
        Iter: Iterator<Item = char>,
    {
        self.stop_at = options.stop_at;
        self.need_end = false;

        let res = self.parse_path(src, output);

        if self.need_end {
            output.end(false);
        }

        res
    }

    fn parse_path(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
        output: &mut Builder,
    ) -> Result<(), ParseError> {
        // A relative move-to at the start of the path is relative to the origin.
        self.current_position = point(0.0, 0.0);
        let mut first_position = point(0.0, 0.0);

        let mut need_start = false;
        let mut prev_quadratic_ctrl = None;
        let mut implicit_cmd = 'M';

        src.skip_whitespace();

        while !src.finished {
            let mut cmd = src.current;
            let cmd_line = src.line;
            let cmd_col = src.col;

            if self.stop_at == Some(cmd) {
                break;
            }

            if cmd.is_ascii_alphabetic() {
                src.advance_one();
            } else {
                cmd = implicit_cmd;
            }

            let is_style = match cmd {
                'f' | 'F' | 's' | 'S' => true,
                _ => false,
            };

            if need_start && !is_style && cmd != 'm' && cmd != 'M' {
                return Err(ParseError::MissingMoveTo {
                    command: cmd,
                    line: cmd_line,
                    column: cmd_col,
                });
            }

            let is_relative = cmd.is_lowercase();

            match cmd {
                'l' | 'L' => {
                    let to = self.parse_endpoint(is_relative, src)?;
                    output.line_to(to);
                }
                'h' | 'H' => {
                    let mut x = self.parse_number(src)?;
                    if is_relative {
                        x += self.current_position.x;
                    }
                    let to = point(x, self.current_position.y);
                    self.current_position = to;
                    output.line_to(to);
                }
                'v' | 'V' => {
                    let mut y = self.parse_number(src)?;
                    if is_relative {
                        y += self.current_position.y;
                    }
                    let to = point(self.current_position.x, y);
                    self.current_position = to;
                    output.line_to(to);
                }
                'q' | 'Q' => {
                    let ctrl = self.parse_point(is_relative, src)?;
                    let to = self.parse_endpoint(is_relative, src)?;
                    prev_quadratic_ctrl = Some(ctrl);
                    output.quadratic_bezier_to(ctrl, to);
                }
                't' | 'T' => {
                    let ctrl = self.get_smooth_ctrl(prev_quadratic_ctrl);
                    let to = self.parse_endpoint(is_relative, src)?;
                    prev_quadratic_ctrl = Some(ctrl);
                    output.quadratic_bezier_to(ctrl, to);
                }
                'f' | 'F' => {
                    let left = self.parse_id(src)?;
                    let right = self.parse_id(src)?;
                    output.set_fills(FillStyles::new(FillId(left), FillId(right)));
                }
                's' | 'S' => {
                    let stroke = self.parse_id(src)?;
                    output.set_stroke(StrokeId(stroke));
                }
                'm' | 'M' => {
                    if self.need_end {
                        output.end(false);
                    }

                    let to = self.parse_endpoint(is_relative, src)?;
                    first_position = to;
                    output.begin(to);
                    self.need_end = true;
                    need_start = false;
                }
                'z' | 'Z' => {
                    output.end(true);
                    self.current_position = first_position;
                    self.need_end = false;
                    need_start = true;
                }
                _ => {
                    return Err(ParseError::Command {
                        command: cmd,
                        line: cmd_line,
                        column: cmd_col,
                    });
                }
            }

            match cmd {
                'q' | 'Q' | 't' | 'T' => {}
                'f' | 'F' | 's' | 'S' => {}
                _ => {
                    prev_quadratic_ctrl = None;
                }
            }

            implicit_cmd = match cmd {
                'm' => 'l',
                'M' => 'L',
                'z' => 'm',
                'Z' => 'M',
                // Style commands don't repeat.
                'f' | 'F' | 's' | 'S' => implicit_cmd,
                c => c,
            };

            src.skip_whitespace();
        }

        Ok(())
    }

    fn get_smooth_ctrl(&self, prev_ctrl: Option<Point>) -> Point {
        if let Some(prev_ctrl) = prev_ctrl {
            self.current_position + (self.current_position - prev_ctrl)
        } else {
            self.current_position
        }
    }

    fn parse_endpoint(
        &mut self,
        is_relative: bool,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<Point, ParseError> {
        let position = self.parse_point(is_relative, src)?;
        self.current_position = position;

        Ok(position)
    }

    fn parse_point(
        &mut self,
        is_relative: bool,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<Point, ParseError> {
        let mut x = self.parse_number(src)?;
        let mut y = self.parse_number(src)?;

        if is_relative {
            x += self.current_position.x;
            y += self.current_position.y;
        }

        Ok(point(x, y))
    }

    fn parse_id(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<u32, ParseError> {
        self.float_buffer.clear();

        src.skip_whitespace();

        let line = src.line;
        let column = src.col;

        while !src.finished && src.current.is_ascii_digit() {
            self.float_buffer.push(src.current);
            src.advance_one();
        }

        match self.float_buffer.parse::<u32>() {
            Ok(val) => Ok(val),
            Err(_) => {
                let mut src_text = std::mem::take(&mut self.float_buffer);
                if src_text.is_empty() && !src.finished {
                    src_text.push(src.current);
                }
                Err(ParseError::Id {
                    src: src_text,
                    line,
                    column,
                })
            }
        }
    }

    fn parse_number(
        &mut self,
        src: &mut Source<impl Iterator<Item = char>>,
    ) -> Result<f32, ParseError> {
        self.float_buffer.clear();

        src.skip_whitespace();

        let line = src.line;
        let column = src.col;

        if src.current == '-' {
            self.float_buffer.push('-');
            src.advance_one();
        }

        while src.current.is_numeric() {
            self.float_buffer.push(src.current);
            src.advance_one();
        }

        if src.current == '.' {
            self.float_buffer.push('.');
            src.advance_one();

            while src.current.is_numeric() {
                self.float_buffer.push(src.current);
                src.advance_one();
            }
        }

        if src.current == 'e' || src.current == 'E' {
            self.float_buffer.push(src.current);
            src.advance_one();

            if src.current == '-' {
                self.float_buffer.push('-');
                src.advance_one();
            }

            while src.current.is_numeric() {
                self.float_buffer.push(src.current);
                src.advance_one();
            }
        }

        match self.float_buffer.parse::<f32>() {
            Ok(val) => Ok(val),
            Err(_) => Err(ParseError::Number {
                src: std::mem::take(&mut self.float_buffer),
                line,
                column,
            }),
        }
    }
}

/// Parses a whole string into a `Path`.
pub fn parse_path(src: &str) -> Result<Path, ParseError> {
    let mut builder = Path::builder();
    PathParser::new().parse(&ParserOptions::DEFAULT, &mut Source::new(src.chars()), &mut builder)?;

    Ok(builder.build())
}

#[cfg(test)]
use path::SegmentKind;

#[test]
fn empty() {
    let mut parser = PathParser::new();

    let mut builder = Path::builder();
    parser
        .parse(&ParserOptions::DEFAULT, &mut Source::new("".chars()), &mut builder)
        .unwrap();

    let mut builder = Path::builder();
    parser
        .parse(&ParserOptions::DEFAULT, &mut Source::new(" ".chars()), &mut builder)
        .unwrap();
    assert!(builder.build().is_empty());
}

#[test]
fn simple_square() {
    let path = parse_path("F 1 0 M 0 0 L 1 0 L 1 1 L 0 1 Z").unwrap();

    assert_eq!(path.sub_paths().len(), 1);
    assert!(path.sub_paths()[0].closed);
    assert_eq!(path.num_segments(), 4);
    for segment in &path {
        assert_eq!(segment.fills, FillStyles::new(FillId(1), FillId::NONE));
        assert_eq!(segment.stroke, StrokeId::NONE);
    }
    assert_eq!(path.fill_ids(), vec![FillId(1)]);
}

#[test]
fn relative_and_axis_commands() {
    let path = parse_path("M 1 1 h 2 v 3 H 0 V 1 l 1 -1 m 5 5 q 1 0 1 1").unwrap();

    let ends: Vec<Point> = path.segments().map(|s| s.to()).collect();
    assert_eq!(
        ends,
        vec![
            point(3.0, 1.0),
            point(3.0, 4.0),
            point(0.0, 4.0),
            point(0.0, 1.0),
            point(1.0, 0.0),
            point(7.0, 6.0),
        ]
    );

    match path.sub_paths()[1].segments[0].kind {
        SegmentKind::Quadratic(curve) => {
            assert_eq!(curve.from, point(6.0, 5.0));
            assert_eq!(curve.ctrl, point(7.0, 5.0));
        }
        SegmentKind::Linear(..) => panic!("expected a curve"),
    }
}

#[test]
fn smooth_quadratic() {
    let path = parse_path("M 0 0 Q 1 1 2 0 T 4 0").unwrap();

    match path.sub_paths()[0].segments[1].kind {
        SegmentKind::Quadratic(curve) => {
            assert_eq!(curve.ctrl, point(3.0, -1.0));
            assert_eq!(curve.to, point(4.0, 0.0));
        }
        SegmentKind::Linear(..) => panic!("expected a curve"),
    }
}

#[test]
fn fill_and_stroke_ids() {
    let path = parse_path("F 1 2 S 4 M 0 0 L 0 1 F 3 0 L 1 1 z").unwrap();
    let segments: Vec<_> = path.segments().collect();

    assert_eq!(segments[0].fills, FillStyles::new(FillId(1), FillId(2)));
    assert_eq!(segments[0].stroke, StrokeId(4));
    assert_eq!(segments[1].fills, FillStyles::new(FillId(3), FillId::NONE));
    // The closing segment uses the styles in effect when closing.
    assert_eq!(segments[2].fills, FillStyles::new(FillId(3), FillId::NONE));
    assert_eq!(path.fill_ids(), vec![FillId(1), FillId(2), FillId(3)]);
}

#[test]
fn style_commands_after_close() {
    // Style commands are allowed between a close and the next move-to.
    let path = parse_path("F 1 0 M 0 0 L 0 1 L 1 1 Z F 2 0 M 5 0 L 5 1 L 6 1 Z").unwrap();
    assert_eq!(path.sub_paths().len(), 2);
    assert_eq!(path.fill_ids(), vec![FillId(1), FillId(2)]);
}

#[test]
fn invalid_cmd() {
    let result = parse_path("x 0 0 0").err().unwrap();
    assert_eq!(
        result,
        ParseError::Command {
            command: 'x',
            line: 0,
            column: 0
        }
    );

    let result = parse_path("\n M 0 \n0 x 1 1").err().unwrap();
    assert_eq!(
        result,
        ParseError::Command {
            command: 'x',
            line: 2,
            column: 2
        }
    );
}

#[test]
fn missing_move_to() {
    let result = parse_path("M 0 0 L 1 1 Z L 2 2").err().unwrap();
    assert_eq!(
        result,
        ParseError::MissingMoveTo {
            command: 'L',
            line: 0,
            column: 14
        }
    );
}

#[test]
fn bad_ids() {
    let result = parse_path("F 1 -2 M 0 0").err().unwrap();
    assert_eq!(
        result,
        ParseError::Id {
            src: "-".to_string(),
            line: 0,
            column: 4
        }
    );

    assert!(parse_path("S x").is_err());
}

#[test]
fn number_scientific_notation() {
    let path = parse_path("M 1e-2 -1E3 L 0 0").unwrap();
    assert_eq!(path.segments().next().unwrap().from(), point(0.01, -1000.0));
}

#[test]
fn bad_numbers() {
    for src in &["M 0 --1", "M 0 1ee2", "M 0 1e--1", "M 0 *2", "M 0 e"] {
        assert!(parse_path(src).is_err(), "{:?}", src);
    }
}

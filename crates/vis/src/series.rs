use std::format;
use std::io::Seek;
use std::io::Write;

use chrono::DateTime;
use chrono::Utc;

use crate::chart::Id;

// The init line is rewritten over this padding once the number of points is
// known; see `SeriesWriter::end`.
const COMMON_RESERVED_BYTES: usize =
51 /* static characters */ +
60 /* 3 * 20 digits for three usizes */ +
1 /* new line */;

/// The JavaScript array names one series is published under: the x values
/// (timestamps), the y values and the hover text.
#[derive(Debug, Clone)]
pub(crate) struct SeriesVars {
    pub(crate) xs: String,
    pub(crate) ys: String,
    pub(crate) ts: String,
}

impl From<Id> for SeriesVars {
    fn from(id: Id) -> SeriesVars {
        Self {
            xs: format!("xs{id}"),
            ys: format!("ys{id}"),
            ts: format!("ts{id}"),
        }
    }
}

/// Writes one series as a JavaScript data file.
///
/// The arrays are declared up front with their final length so the charting
/// page never resizes them while loading; since that length is only known
/// after the last point, the declaration line is written over reserved
/// padding at the start of the file.
pub(crate) struct SeriesWriter<W> {
    writer: W,
    index: usize,
    vars: SeriesVars,
}

impl<W: Write + Seek> SeriesWriter<W> {
    pub fn new(writer: W, vars: SeriesVars) -> Self {
        Self {
            writer,
            index: 0,
            vars,
        }
    }

    pub fn start(&mut self) -> Result<(), std::io::Error> {
        let total_reserved_bytes = COMMON_RESERVED_BYTES
            + self.vars.xs.len()
            + self.vars.ys.len()
            + self.vars.ts.len();
        let whitespaces = b" ".repeat(total_reserved_bytes);

        self.writer.write_all(&whitespaces)?;
        self.writer.write_all(b"\n")
    }

    pub fn write(
        &mut self,
        x: DateTime<Utc>,
        y: f64,
        text: &str,
    ) -> Result<(), std::io::Error> {
        let line = format!(
            "{xs}[{idx}] = \"{x}\"; {ys}[{idx}] = {y}; {ts}[{idx}] = \"{text}\";\n",
            xs = self.vars.xs,
            ys = self.vars.ys,
            ts = self.vars.ts,
            idx = self.index,
            x = x.to_rfc3339(),
            y = y,
            text = escape(text),
        );

        self.writer.write_all(line.as_bytes())?;
        self.index += 1;

        Ok(())
    }

    pub fn end(mut self) -> Result<(), std::io::Error> {
        self.writer.rewind()?;

        let init_line = format!(
            "let {xs} = new Array({size}), {ys} = new Array({size}), {ts} = new Array({size});\n",
            xs = self.vars.xs,
            ys = self.vars.ys,
            ts = self.vars.ts,
            size = self.index
        );

        self.writer.write_all(init_line.as_bytes())
    }
}

// Hover text ends up inside a double-quoted JavaScript string literal;
// line breaks become `<br>`, which is what the hover box renders anyway.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("<br>"),
            '\r' => {}
            c => escaped.push(c),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::TimeZone;

    use super::*;

    #[test]
    fn write_series_data() -> Result<(), std::io::Error> {
        let buffer: Vec<u8> = Vec::new();
        let mut writer: Cursor<Vec<u8>> = Cursor::new(buffer);
        let vars = SeriesVars {
            xs: String::from("xs"),
            ys: String::from("ys"),
            ts: String::from("ts"),
        };
        let mut series = SeriesWriter::new(&mut writer, vars);

        series.start()?;
        for (minute, y) in [(0, 5.0), (1, 7.0)] {
            let x = Utc.with_ymd_and_hms(2019, 7, 29, 10, minute, 0).unwrap();
            series.write(x, y, "hover")?;
        }
        series.end()?;

        let init_line =
            "let xs = new Array(2), ys = new Array(2), ts = new Array(2);\n";
        let padding = COMMON_RESERVED_BYTES + 6 - init_line.len();
        let expected_output = format!(
            "{init_line}{spaces}\n\
             xs[0] = \"2019-07-29T10:00:00+00:00\"; ys[0] = 5; ts[0] = \"hover\";\n\
             xs[1] = \"2019-07-29T10:01:00+00:00\"; ys[1] = 7; ts[1] = \"hover\";\n",
            spaces = " ".repeat(padding),
        );

        let buff = writer.into_inner();
        let content = std::str::from_utf8(&buff).unwrap();

        assert_eq!(expected_output, content);

        Ok(())
    }

    #[test]
    fn escapes_hover_text_for_a_js_string_literal() {
        assert_eq!(escape(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape("a\\b"), "a\\\\b");
        assert_eq!(escape("two\nlines"), "two<br>lines");
    }
}

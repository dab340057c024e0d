use microscope_core::DisplayRecord;
use std::io::{self, Write};

const HEADERS: [&str; 6] = ["#", "label", "source", "scraped", "title", "content"];

fn cells(idx: usize, r: &DisplayRecord) -> [String; 6] {
    [
        idx.to_string(),
        r.label.clone(),
        r.source.clone(),
        if r.scraped { "yes" } else { "no" }.to_string(),
        one_line(&r.title),
        one_line(&r.content),
    ]
}

// table cells must not break rows
fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Plain-text table; the last column is left unpadded.
pub fn write_table<W: Write>(out: &mut W, rows: &[DisplayRecord]) -> io::Result<()> {
    let body: Vec<[String; 6]> = rows.iter().enumerate().map(|(i, r)| cells(i, r)).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let write_row = |out: &mut W, row: &[&str]| -> io::Result<()> {
        let last = row.len() - 1;
        for (i, cell) in row.iter().enumerate() {
            if i == last {
                writeln!(out, "{cell}")?;
            } else {
                let pad = widths[i] - cell.chars().count();
                write!(out, "{cell}{}  ", " ".repeat(pad))?;
            }
        }
        Ok(())
    };

    write_row(&mut *out, &HEADERS[..])?;
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut *out, &rule.iter().map(String::as_str).collect::<Vec<_>>())?;
    for row in &body {
        write_row(&mut *out, &row.iter().map(String::as_str).collect::<Vec<_>>())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, content: &str) -> DisplayRecord {
        DisplayRecord {
            url: "u".into(),
            title: "t".into(),
            author: String::new(),
            date: String::new(),
            categories: String::new(),
            last_scraped: String::new(),
            content: content.into(),
            source: String::new(),
            label: label.into(),
            scraped: true,
        }
    }

    #[test]
    fn columns_line_up() {
        let mut buf = Vec::new();
        write_table(
            &mut buf,
            &[row("IRRELEVANTE", "a\nb"), row("", "short")],
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        let col = lines[0].find("source").unwrap();
        assert!(lines[2].ends_with("a b"));
        assert_eq!(&lines[3][col..col + 1], " ");
    }

    #[test]
    fn empty_table_has_header_only() {
        let mut buf = Vec::new();
        write_table(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 2);
    }
}

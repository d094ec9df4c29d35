//! HTML serialization of bingo cards.

use std::fmt::Write;

use super::model::BingoCard;

/// Element id the renderer screenshots.
pub const CARD_ELEMENT_ID: &str = "bingocard";

const HEAD: &str = concat!(
    "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">\n",
    "<html lang=\"en\">\n<head>\n",
    "<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\">\n",
    "<title>Bingo Cards</title>\n",
    "<style type=\"text/css\">\n",
    "\tbody { margin: 0; font-size: 14px; font-family: 'Helvetica', 'Arial', sans-serif; width: 20em; height: 20em; }\n",
    "\ttable { border-spacing: 2px; table-layout: fixed; }\n",
    "\t.newpage { page-break-after:always; }\n",
    "\ttd { text-align: center; border: thin black solid; padding: 10px; width: 20%; height: 20%; }\n",
    "</style>\n</head>\n<body>\n",
);

const TAIL: &str = "</body></html>";

/// Render a single card as a complete HTML document.
pub fn card_document(card: &BingoCard) -> String {
    let mut html = String::from(HEAD);
    write_table(&mut html, card, true);
    html.push_str(TAIL);
    html
}

/// Render several cards into one printable sheet.
///
/// Every card but the last is followed by a page break; the last one
/// carries the `bingocard` id.
pub fn sheet_document(cards: &[BingoCard]) -> String {
    let mut html = String::from(HEAD);
    for (i, card) in cards.iter().enumerate() {
        write_table(&mut html, card, i + 1 == cards.len());
    }
    html.push_str(TAIL);
    html
}

fn write_table(out: &mut String, card: &BingoCard, tagged: bool) {
    if tagged {
        let _ = writeln!(out, "<table id=\"{CARD_ELEMENT_ID}\">");
    } else {
        out.push_str("<table class=\"newpage\">\n");
    }
    for row in card.rows() {
        out.push_str("\t<tr>\n");
        for cell in row {
            let _ = writeln!(out, "\t\t<td>{}</td>", escape(cell));
        }
        out.push_str("\t</tr>\n");
    }
    out.push_str("</table>\n");
}

/// Escape text for use inside an HTML element.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

//! Markdown reading material.

use casebook_ui::widgets::PaperBlock;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// Flattens Markdown into paper blocks.
///
/// Headings, paragraphs and list items become blocks; inline formatting is
/// dropped and line breaks collapse into spaces. Nested list items are
/// emitted as separate items in document order.
#[must_use]
pub fn parse_markdown(source: &str) -> Vec<PaperBlock> {
    let mut blocks = Vec::new();
    let mut text = String::new();
    let mut item_depth = 0usize;

    for event in Parser::new(source) {
        match event {
            Event::Start(Tag::Item) => {
                flush(&mut blocks, &mut text, PaperBlock::Item);
                item_depth += 1;
            }
            Event::End(TagEnd::Item) => {
                flush(&mut blocks, &mut text, PaperBlock::Item);
                item_depth = item_depth.saturating_sub(1);
            }
            Event::End(TagEnd::Heading(_)) => flush(&mut blocks, &mut text, PaperBlock::Heading),
            Event::End(TagEnd::Paragraph) => {
                if item_depth == 0 {
                    flush(&mut blocks, &mut text, PaperBlock::Paragraph);
                } else {
                    text.push(' ');
                }
            }
            Event::Text(chunk) | Event::Code(chunk) => text.push_str(&chunk),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    flush(&mut blocks, &mut text, PaperBlock::Paragraph);
    blocks
}

fn flush(blocks: &mut Vec<PaperBlock>, text: &mut String, make: fn(String) -> PaperBlock) {
    let trimmed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    text.clear();
    if !trimmed.is_empty() {
        blocks.push(make(trimmed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_markdown_extracts_blocks_in_order() {
        let source = "# The Study\n\nA *quiet* room\nwith `three` lamps.\n\n- a key\n- a map\n\n## Notes\n\nDone.";

        let blocks = parse_markdown(source);

        assert_eq!(
            blocks,
            vec![
                PaperBlock::Heading("The Study".to_owned()),
                PaperBlock::Paragraph("A quiet room with three lamps.".to_owned()),
                PaperBlock::Item("a key".to_owned()),
                PaperBlock::Item("a map".to_owned()),
                PaperBlock::Heading("Notes".to_owned()),
                PaperBlock::Paragraph("Done.".to_owned()),
            ]
        );
    }

    #[test]
    fn test_loose_list_items_keep_their_paragraph_text() {
        let blocks = parse_markdown("- first\n\n  more\n\n- second\n");

        assert_eq!(
            blocks,
            vec![
                PaperBlock::Item("first more".to_owned()),
                PaperBlock::Item("second".to_owned()),
            ]
        );
    }
}

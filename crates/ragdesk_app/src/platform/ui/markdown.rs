//! Markdown to styled terminal text.

use colored::{ColoredString, Colorize};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

#[derive(Default)]
struct Style {
    bold: usize,
    italic: usize,
    heading: bool,
    link: bool,
}

impl Style {
    fn apply(&self, text: &str) -> ColoredString {
        let mut styled = text.normal();
        if self.bold > 0 || self.heading {
            styled = styled.bold();
        }
        if self.italic > 0 {
            styled = styled.italic();
        }
        if self.heading {
            styled = styled.bright_white();
        }
        if self.link {
            styled = styled.bright_blue().underline();
        }
        styled
    }
}

/// Render markdown as terminal lines. Control characters are stripped from
/// all text so answers cannot emit their own escape sequences.
pub fn markdown_to_terminal(source: &str) -> Vec<String> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut style = Style::default();
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut link_targets: Vec<String> = Vec::new();
    let mut in_code_block = false;
    let mut first_cell = true;

    for event in Parser::new_ext(source, options) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                flush(&mut current, &mut lines);
                style.heading = true;
            }
            Event::End(TagEnd::Heading(_)) => {
                style.heading = false;
                flush(&mut current, &mut lines);
            }
            Event::Start(Tag::Strong) => style.bold += 1,
            Event::End(TagEnd::Strong) => style.bold = style.bold.saturating_sub(1),
            Event::Start(Tag::Emphasis) => style.italic += 1,
            Event::End(TagEnd::Emphasis) => style.italic = style.italic.saturating_sub(1),
            Event::Start(Tag::Link { dest_url, .. }) => {
                style.link = true;
                link_targets.push(dest_url.to_string());
            }
            Event::End(TagEnd::Link) => {
                style.link = false;
                if let Some(target) = link_targets.pop() {
                    let target = strip_controls(&target);
                    current.push_str(&format!(" ({target})").dimmed().to_string());
                }
            }
            Event::Start(Tag::List(start)) => {
                flush(&mut current, &mut lines);
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                flush(&mut current, &mut lines);
                lists.pop();
            }
            Event::Start(Tag::Item) => {
                flush(&mut current, &mut lines);
                let indent = "  ".repeat(lists.len().saturating_sub(1));
                let bullet = match lists.last_mut() {
                    Some(Some(number)) => {
                        let label = format!("{number}. ");
                        *number += 1;
                        label
                    }
                    _ => "• ".to_string(),
                };
                current.push_str(&indent);
                current.push_str(&bullet.cyan().to_string());
            }
            Event::End(TagEnd::Item) => flush(&mut current, &mut lines),
            Event::Start(Tag::CodeBlock(_)) => {
                flush(&mut current, &mut lines);
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::End(TagEnd::Paragraph) => {
                flush(&mut current, &mut lines);
                if lists.is_empty() {
                    lines.push(String::new());
                }
            }
            Event::Start(Tag::TableRow) | Event::Start(Tag::TableHead) => first_cell = true,
            Event::Start(Tag::TableCell) => {
                if !first_cell {
                    current.push_str(" | ");
                }
                first_cell = false;
            }
            Event::End(TagEnd::TableRow) | Event::End(TagEnd::TableHead) => {
                flush(&mut current, &mut lines)
            }
            Event::End(TagEnd::Table) => lines.push(String::new()),
            Event::Text(text) if in_code_block => {
                for line in strip_controls(&text).lines() {
                    lines.push(format!("    {}", line.yellow()));
                }
            }
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                current.push_str(&style.apply(&strip_controls(&text)).to_string());
            }
            Event::Code(code) => {
                current.push_str(&strip_controls(&code).yellow().to_string());
            }
            Event::SoftBreak => current.push(' '),
            Event::HardBreak => flush(&mut current, &mut lines),
            Event::Rule => {
                flush(&mut current, &mut lines);
                lines.push("────────".dimmed().to_string());
            }
            Event::TaskListMarker(done) => current.push_str(if done { "[x] " } else { "[ ] " }),
            _ => {}
        }
    }
    flush(&mut current, &mut lines);

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

fn flush(current: &mut String, lines: &mut Vec<String>) {
    if !current.is_empty() {
        lines.push(std::mem::take(current));
    }
}

/// Drop control characters other than newline and tab.
pub fn strip_controls(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(source: &str) -> Vec<String> {
        colored::control::set_override(false);
        markdown_to_terminal(source)
    }

    #[test]
    fn paragraphs_are_separated_by_blank_lines() {
        assert_eq!(
            plain("First paragraph.\n\nSecond one."),
            vec!["First paragraph.", "", "Second one."]
        );
    }

    #[test]
    fn lists_get_bullets_and_numbers() {
        assert_eq!(plain("- tyres\n- brakes\n"), vec!["• tyres", "• brakes"]);
        assert_eq!(plain("3. check\n4. refill\n"), vec!["3. check", "4. refill"]);
    }

    #[test]
    fn links_show_their_target() {
        assert_eq!(
            plain("See [manual](https://example.com/m.pdf)."),
            vec!["See manual (https://example.com/m.pdf)."]
        );
    }

    #[test]
    fn code_blocks_are_indented() {
        assert_eq!(plain("```\nobd2 scan\n```\n"), vec!["    obd2 scan"]);
    }

    #[test]
    fn escape_sequences_are_removed() {
        let lines = plain("danger \u{1b}[2J cleared");
        assert_eq!(lines, vec!["danger [2J cleared"]);
    }
}

//! Report section splitting.

/// Split a report blob into its `---`-delimited sections.
///
/// Only a line that is exactly `---` after trimming acts as a
/// delimiter, so prose mentioning `---` inline stays intact. Sections
/// come back trimmed; with no delimiter the whole trimmed input is the
/// single section. Every section is kept, empty ones included; what to
/// skip is the renderer's call, not the splitter's.
pub fn split_sections(text: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim() == "---" {
            sections.push(current.trim().to_string());
            current.clear();
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    sections.push(current.trim().to_string());
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_delimiter_line() {
        assert_eq!(split_sections("A\n---\nB"), ["A", "B"]);
    }

    #[test]
    fn no_delimiter_yields_single_trimmed_section() {
        assert_eq!(split_sections("A"), ["A"]);
        assert_eq!(split_sections("  A  \n"), ["A"]);
    }

    #[test]
    fn extra_sections_are_kept_not_dropped() {
        assert_eq!(split_sections("A\n---\nB\n---\nC"), ["A", "B", "C"]);
    }

    #[test]
    fn sections_are_trimmed() {
        assert_eq!(split_sections("\n\nA\n\n---\n\n  B  \n"), ["A", "B"]);
    }

    #[test]
    fn delimiter_with_surrounding_whitespace_still_splits() {
        assert_eq!(split_sections("A\n  ---  \nB"), ["A", "B"]);
    }

    #[test]
    fn inline_triple_dash_is_not_a_delimiter() {
        assert_eq!(
            split_sections("pros --- cons\nmore"),
            ["pros --- cons\nmore"]
        );
    }

    #[test]
    fn four_dashes_is_not_a_delimiter() {
        assert_eq!(split_sections("A\n----\nB"), ["A\n----\nB"]);
    }

    #[test]
    fn trailing_delimiter_leaves_an_empty_section() {
        assert_eq!(split_sections("A\n---\n"), ["A", ""]);
    }

    #[test]
    fn empty_input_is_one_empty_section() {
        assert_eq!(split_sections(""), [""]);
    }
}

use crate::{crossword::CrosswordError, word::WordEntry};

/// Parses a word list with one `WORD;clue` entry per line
///
/// Blank lines and lines starting with `#` are skipped, words are upper cased.
/// The entries are not validated, pass them to [validate_words](crate::word::validate_words) or a [driver](crate::search::SearchDriver).
///
/// ```
/// # use crossword_layout::preset::parse_word_list;
/// # use crossword_layout::word::WordEntry;
/// let words = parse_word_list("# animals\ncat;Pet that purrs\n\ndog; Loyal; friendly pet").unwrap();
/// assert_eq!(words, vec![WordEntry::new("CAT", "Pet that purrs"), WordEntry::new("DOG", "Loyal; friendly pet")]);
/// ```
///
/// # Errors
///
/// [CrosswordError::MalformedPresetLine] - a line has no `;`
pub fn parse_word_list(text: &str) -> Result<Vec<WordEntry>, CrosswordError>
{
    text.lines()
        .enumerate()
        .map(|(ind, line)| (ind + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_number, line)|
        {
            let (word, clue) = line.split_once(';')
                .ok_or_else(|| CrosswordError::MalformedPresetLine { line: line_number, content: line.to_owned() })?;
            Ok(WordEntry::new(word.trim().to_uppercase(), clue.trim()))
        })
        .collect()
}

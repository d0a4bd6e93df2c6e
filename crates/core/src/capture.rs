use std::fmt;

use crate::model::NewTask;

/// Trim the raw title a user typed and turn it into a create draft.
pub fn prepare_new_task(owner_id: u64, raw_title: &str) -> Result<NewTask, TitleError> {
    let title = raw_title.trim();
    if title.is_empty() {
        return Err(TitleError::Empty);
    }
    Ok(NewTask::new(owner_id, title))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleError {
    Empty,
}

impl fmt::Display for TitleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleError::Empty => write!(f, "Title should not be empty"),
        }
    }
}

impl std::error::Error for TitleError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n ")]
    fn rejects_blank_titles(#[case] raw: &str) {
        assert_eq!(prepare_new_task(1, raw), Err(TitleError::Empty));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let draft = prepare_new_task(3, "  Call the bank \n").unwrap();
        assert_eq!(draft.title, "Call the bank");
        assert_eq!(draft.owner_id, 3);
        assert!(!draft.completed);
    }
}

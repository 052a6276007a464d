use crate::error::{Error, Result};

/// Trimmed text, or `None` when the input is absent or whitespace only.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trimmed required text; blank input is a validation failure for `field`.
pub fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::BadRequest(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Splits comma-separated skills, trimming each and dropping empties.
pub fn split_skills(raw: &str) -> Vec<String> {
    clean_skills(raw.split(','))
}

pub fn clean_skills<I, S>(skills: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_becomes_none() {
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" Oran ".to_string())), Some("Oran".to_string()));
    }

    #[test]
    fn required_text_rejects_whitespace() {
        assert!(matches!(require_text("Title", " \t"), Err(Error::BadRequest(_))));
        assert_eq!(require_text("Title", " Backend dev ").unwrap(), "Backend dev");
    }

    #[test]
    fn skills_are_split_and_trimmed() {
        assert_eq!(split_skills("rust, sql ,, ,docker"), vec!["rust", "sql", "docker"]);
        assert!(split_skills("  ").is_empty());
    }
}

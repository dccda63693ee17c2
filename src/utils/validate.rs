use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

// 例如 1RV21CS001
static USN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{5,20}$").expect("Invalid usn regex"));

static FACULTY_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{2,20}$").expect("Invalid faculty id regex"));

static COURSE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{2,20}$").expect("Invalid course code regex"));

const MIN_PASSWORD_LEN: usize = 6;

const COMMON_PASSWORDS: &[&str] = &[
    "123456", "1234567", "12345678", "123456789", "password", "qwerty", "abc123", "111111",
    "letmein", "admin123",
];

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err("Email format is invalid");
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err("Name is required");
    }
    if len > 100 {
        return Err("Name must be at most 100 characters");
    }
    Ok(())
}

pub fn validate_usn(usn: &str) -> Result<(), &'static str> {
    if !USN_RE.is_match(usn.trim()) {
        return Err("USN must be 5-20 letters or digits");
    }
    Ok(())
}

pub fn validate_faculty_id(faculty_id: &str) -> Result<(), &'static str> {
    if !FACULTY_ID_RE.is_match(faculty_id.trim()) {
        return Err("Faculty ID must be 2-20 letters, digits, '-' or '_'");
    }
    Ok(())
}

pub fn validate_course_code(code: &str) -> Result<(), &'static str> {
    if !COURSE_CODE_RE.is_match(code.trim()) {
        return Err("Course code must be 2-20 letters, digits, '-' or '_'");
    }
    Ok(())
}

/// 密码策略：至少 6 个字符，且不是常见弱密码
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters long");
    }
    if COMMON_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        return Err("Password is too common, please choose a stronger password");
    }
    Ok(())
}

pub fn validate_semester(semester: i32) -> Result<(), &'static str> {
    if !(1..=8).contains(&semester) {
        return Err("Semester must be between 1 and 8");
    }
    Ok(())
}

pub fn validate_cgpa(cgpa: f64) -> Result<(), &'static str> {
    if !cgpa.is_finite() || !(0.0..=10.0).contains(&cgpa) {
        return Err("CGPA must be between 0 and 10");
    }
    Ok(())
}

pub fn validate_percentage(value: f64) -> Result<(), &'static str> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err("Percentage must be between 0 and 100");
    }
    Ok(())
}

pub fn validate_credits(credits: i32) -> Result<(), &'static str> {
    if !(1..=6).contains(&credits) {
        return Err("Credits must be between 1 and 6");
    }
    Ok(())
}

pub fn validate_score(score: f64) -> Result<(), &'static str> {
    if !score.is_finite() || !(0.0..=100.0).contains(&score) {
        return Err("Score must be between 0 and 100");
    }
    Ok(())
}

/// 单门课程课时上限
pub const MAX_CLASS_COUNT: i32 = 10_000;

/// 已出勤课时不能超过总课时
pub fn validate_attendance_counts(total: i32, attended: i32) -> Result<(), &'static str> {
    if total < 0 || attended < 0 {
        return Err("Class counts must not be negative");
    }
    if total > MAX_CLASS_COUNT {
        return Err("Total classes must not exceed 10000");
    }
    if attended > total {
        return Err("Attended classes cannot exceed total classes");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("asha@college.edu").is_ok());
        assert!(validate_email(" asha@college.edu ").is_ok());
        assert!(validate_email("asha@college").is_err());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("abcdef").is_ok());
        assert_eq!(
            validate_password("abc"),
            Err("Password must be at least 6 characters long")
        );
        assert!(validate_password("Password").is_err());
        assert!(validate_password("123456").is_err());
    }

    #[test]
    fn test_usn_and_faculty_id() {
        assert!(validate_usn("1RV21CS001").is_ok());
        assert!(validate_usn("1RV 21").is_err());
        assert!(validate_faculty_id("FAC-001").is_ok());
        assert!(validate_faculty_id("F").is_err());
    }

    #[test]
    fn test_ranges() {
        assert!(validate_semester(1).is_ok());
        assert!(validate_semester(8).is_ok());
        assert!(validate_semester(9).is_err());
        assert!(validate_cgpa(10.0).is_ok());
        assert!(validate_cgpa(10.1).is_err());
        assert!(validate_cgpa(f64::NAN).is_err());
        assert!(validate_percentage(100.0).is_ok());
        assert!(validate_percentage(-1.0).is_err());
        assert!(validate_credits(6).is_ok());
        assert!(validate_credits(0).is_err());
        assert!(validate_score(0.0).is_ok());
        assert!(validate_score(-0.5).is_err());
        assert!(validate_score(100.5).is_err());
    }

    #[test]
    fn test_attendance_counts() {
        assert!(validate_attendance_counts(10, 10).is_ok());
        assert!(validate_attendance_counts(0, 0).is_ok());
        assert!(validate_attendance_counts(10, 11).is_err());
        assert!(validate_attendance_counts(-1, 0).is_err());
        assert!(validate_attendance_counts(MAX_CLASS_COUNT, MAX_CLASS_COUNT).is_ok());
        assert!(validate_attendance_counts(MAX_CLASS_COUNT + 1, 0).is_err());
        assert!(validate_attendance_counts(2_000_000_000, 2_000_000_000).is_err());
    }
}

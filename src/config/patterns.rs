use regex::Regex;

use crate::error::Result;

/// Placeholder syntaxes that must survive translation unchanged
pub fn placeholder_patterns() -> Result<Vec<Regex>> {
    Ok(vec![
        // Qt QString::arg markers: %1 .. %99, %L1
        Regex::new(r"%L?\d{1,2}")?,
        // Qt plural count
        Regex::new(r"%n")?,
        // Python str.format fields: {}, {0}, {name}
        Regex::new(r"\{[A-Za-z0-9_]*\}")?,
        // printf style
        Regex::new(r"%[sd]")?,
    ])
}

/// Trailing locale code of a catalog file stem: `app.zh_CN`, `qt_zh_CN`, `my_app_de`
pub fn locale_suffix_pattern() -> Result<Regex> {
    Ok(Regex::new(r"(?:^|[._])([a-z]{2,3}(?:_[A-Z]{2})?)$")?)
}

//! Output path planning

use std::fmt::Display;
use std::path::{Component, Path, PathBuf};

use cellpic_xlsx::options::base_name_of;
use chrono::{DateTime, Local, TimeZone};

/// Turns input paths and an optional template into output paths.
///
/// Timestamps are taken once, so every file of a run gets the same stamp.
#[derive(Debug, Clone)]
pub struct OutputPlanner {
    date: String,
    date_time: String,
    stamp: String,
}

impl OutputPlanner {
    /// Planner stamped with the current local time
    pub fn now() -> Self {
        Self::at(&Local::now())
    }

    /// Planner stamped with `time`
    pub fn at<Tz>(time: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            date: time.format("%Y-%m-%d").to_string(),
            date_time: time.format("%Y-%m-%d_%H-%M-%S").to_string(),
            stamp: time.format("%Y%m%d%H%M%S").to_string(),
        }
    }

    /// Output path for `input`.
    ///
    /// Without a template, `_with_image_file_names_<stamp>.xlsx` replaces the
    /// input's `.xlsx` suffix. A template has `{{DATE}}`, `{{DATE_TIME}}` and
    /// `{{FILE_NAME}}` substituted; if none of its components is the input's
    /// base name it names a directory, and `<base name>.xlsx` is joined onto it.
    pub fn plan(&self, input: &Path, template: Option<&str>) -> PathBuf {
        let Some(template) = template else {
            return self.default_path(input);
        };

        let base = base_name_of(input);
        let path = PathBuf::from(
            template
                .replace("{{DATE}}", &self.date)
                .replace("{{DATE_TIME}}", &self.date_time)
                .replace("{{FILE_NAME}}", &base),
        );

        let names_file = path
            .components()
            .any(|c| matches!(c, Component::Normal(s) if s.to_string_lossy() == base));
        if names_file {
            path
        } else {
            path.join(format!("{}.xlsx", base))
        }
    }

    fn default_path(&self, input: &Path) -> PathBuf {
        let input = input.to_string_lossy();
        let stem = input.strip_suffix(".xlsx").unwrap_or(&input);
        PathBuf::from(format!("{}_with_image_file_names_{}.xlsx", stem, self.stamp))
    }
}

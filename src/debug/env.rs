const ROOT_PREFIX: &str = "QUADEDGE";

pub mod svg {
    use std::{env, path};

    use crate::debug;
    use crate::debug::svg::{SvgObserver, SvgOutputLevel};

    const GROUP_PREFIX: &str = "SVG";

    /// Builds an [SvgObserver] from `QUADEDGE_SVG_OUTPUT_PATH` and
    /// `QUADEDGE_SVG_OUTPUT_LEVEL`, for ad-hoc debugging without touching
    /// the call site's configuration plumbing. The caller still passes the
    /// observer in explicitly; the algorithms never read the environment.
    pub fn observer_from_env() -> Option<SvgObserver> {
        let path = output_path()?;
        let level = output_level();
        if level == SvgOutputLevel::None {
            return None;
        }
        Some(SvgObserver::new(path, level))
    }

    pub(crate) fn output_path() -> Option<path::PathBuf> {
        const KEY: &str = "OUTPUT_PATH";
        let key = format!("{}_{}_{}", super::ROOT_PREFIX, GROUP_PREFIX, KEY);

        if let Ok(value) = env::var(key) {
            Some(path::PathBuf::from(value))
        } else {
            None
        }
    }

    pub(crate) fn output_level() -> debug::svg::SvgOutputLevel {
        const KEY: &str = "OUTPUT_LEVEL";
        let key = format!("{}_{}_{}", super::ROOT_PREFIX, GROUP_PREFIX, KEY);

        match env::var(key) {
            Ok(value) => {
                match value.to_ascii_lowercase().as_str() {
                    "3" => SvgOutputLevel::AllSteps,
                    "2" => SvgOutputLevel::MajorSteps,
                    "1" => SvgOutputLevel::ResultOnly,
                    "0" | _ => SvgOutputLevel::None,
                }
            }
            Err(_) => SvgOutputLevel::None,
        }
    }
}

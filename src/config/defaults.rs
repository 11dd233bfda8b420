use super::constants::*;

pub(crate) fn log_level() -> Option<String> {
    Some("info".to_string())
}

pub(crate) fn log_file_path() -> String {
    LOG_FILE_PATH.to_string()
}

pub(crate) fn endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

pub(crate) fn api_prefix() -> String {
    API_PREFIX.to_string()
}

pub(crate) fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

pub(crate) fn temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

pub(crate) fn top_p() -> f32 {
    DEFAULT_TOP_P
}

pub(crate) fn page_size() -> usize {
    PAGE_SIZE
}

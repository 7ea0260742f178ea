use std::path::{Path, PathBuf};

use anyhow::Result;
use image::DynamicImage;

use crate::types::Detection;

/// Text recognizer contract.
///
/// Implementations are long-lived and must tolerate concurrent calls from several workers.
pub trait Recognizer: Send + Sync {
    /// Recognize text in a grayscale or color raster.
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<Detection>>;
}

impl<R: Recognizer + ?Sized> Recognizer for Box<R> {
    fn recognize(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        (**self).recognize(image)
    }
}

/// OCR language information.
#[derive(Debug, Clone)]
pub struct OcrLanguageInfo {
    /// Language identifier (e.g. "latin", "english").
    pub id: String,
    pub display_name: String,
    /// Recognition model filename.
    pub rec_model: String,
    /// Charset filename.
    pub charset_file: String,
}

/// Where the PaddleOCR model files live and which recognition model to load.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub models_dir: PathBuf,
    pub language: String,
}

impl OcrConfig {
    pub fn new(models_dir: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            models_dir: models_dir.into(),
            language: language.into(),
        }
    }
}

/// Detection model shared by all languages.
pub const DETECTION_MODEL: &str = "PP-OCRv5_mobile_det.mnn";

// (id, display_name, rec_model, charset)
const LANGUAGE_MODELS: [(&str, &str, &str, &str); 5] = [
    (
        "latin",
        "Latin",
        "latin_PP-OCRv5_mobile_rec_infer.mnn",
        "ppocr_keys_latin.txt",
    ),
    (
        "english",
        "English",
        "en_PP-OCRv5_mobile_rec_infer.mnn",
        "ppocr_keys_en.txt",
    ),
    (
        "chinese",
        "简体中文",
        "PP-OCRv5_mobile_rec.mnn",
        "ppocr_keys_v5.txt",
    ),
    (
        "cyrillic",
        "Кириллица",
        "cyrillic_PP-OCRv5_mobile_rec_infer.mnn",
        "ppocr_keys_cyrillic.txt",
    ),
    (
        "korean",
        "한국어",
        "korean_PP-OCRv5_mobile_rec_infer.mnn",
        "ppocr_keys_korean.txt",
    ),
];

/// Languages whose recognition model and charset are both present in `models_dir`.
pub fn get_available_languages(models_dir: &Path) -> Vec<OcrLanguageInfo> {
    LANGUAGE_MODELS
        .iter()
        .filter(|(_, _, rec_model, charset)| {
            models_dir.join(rec_model).exists() && models_dir.join(charset).exists()
        })
        .map(|(id, display_name, rec_model, charset)| OcrLanguageInfo {
            id: id.to_string(),
            display_name: display_name.to_string(),
            rec_model: rec_model.to_string(),
            charset_file: charset.to_string(),
        })
        .collect()
}

/// Resolve (detection, recognition, charset) paths for `config`.
///
/// Falls back to the first available language when the configured one is missing.
pub fn get_model_paths(config: &OcrConfig) -> Result<(PathBuf, PathBuf, PathBuf)> {
    let det_path = config.models_dir.join(DETECTION_MODEL);

    let available = get_available_languages(&config.models_dir);
    let lang_info = available
        .iter()
        .find(|l| l.id == config.language)
        .or_else(|| available.first())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "no OCR recognition model found in {}",
                config.models_dir.display()
            )
        })?;

    if lang_info.id != config.language {
        log::warn!(
            "OCR language {:?} not installed, using {:?}",
            config.language,
            lang_info.id
        );
    }

    if !det_path.exists() {
        anyhow::bail!("detection model not found: {}", det_path.display());
    }

    Ok((
        det_path,
        config.models_dir.join(&lang_info.rec_model),
        config.models_dir.join(&lang_info.charset_file),
    ))
}

#[cfg(feature = "paddle")]
pub use paddle::{PaddleRecognizer, create_engine};

#[cfg(feature = "paddle")]
mod paddle {
    use anyhow::Result;
    use image::DynamicImage;
    use ocr_rs::OcrEngine;
    use parking_lot::Mutex;

    use super::{OcrConfig, Recognizer, get_model_paths};
    use crate::types::Detection;

    /// Create an OCR engine instance.
    pub fn create_engine(config: &OcrConfig) -> Result<OcrEngine> {
        let (det_path, rec_path, charset_path) = get_model_paths(config)?;

        OcrEngine::new(&det_path, &rec_path, &charset_path, None)
            .map_err(|e| anyhow::anyhow!("failed to create OCR engine: {}", e))
    }

    /// PaddleOCR (PP-OCRv5 via MNN) recognizer.
    pub struct PaddleRecognizer {
        engine: Mutex<OcrEngine>,
    }

    impl PaddleRecognizer {
        pub fn new(config: &OcrConfig) -> Result<Self> {
            Ok(Self {
                engine: Mutex::new(create_engine(config)?),
            })
        }
    }

    impl Recognizer for PaddleRecognizer {
        fn recognize(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
            let raw_results = self
                .engine
                .lock()
                .recognize(image)
                .map_err(|e| anyhow::anyhow!("OCR recognition failed: {}", e))?;

            Ok(raw_results
                .into_iter()
                .filter(|r| !r.text.trim().is_empty())
                .map(|r| {
                    Detection::from_rect(
                        r.bbox.rect.left(),
                        r.bbox.rect.top(),
                        r.bbox.rect.width() as i32,
                        r.bbox.rect.height() as i32,
                        r.text,
                        r.confidence,
                    )
                })
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{DETECTION_MODEL, OcrConfig, get_available_languages, get_model_paths};

    fn touch(dir: &std::path::Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn empty_models_dir_has_no_languages() {
        let dir = tempfile::tempdir().unwrap();
        assert!(get_available_languages(dir.path()).is_empty());
        assert!(get_model_paths(&OcrConfig::new(dir.path(), "latin")).is_err());
    }

    #[test]
    fn resolves_configured_language() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), DETECTION_MODEL);
        touch(dir.path(), "latin_PP-OCRv5_mobile_rec_infer.mnn");
        touch(dir.path(), "ppocr_keys_latin.txt");
        touch(dir.path(), "en_PP-OCRv5_mobile_rec_infer.mnn");
        touch(dir.path(), "ppocr_keys_en.txt");

        let (det, rec, charset) = get_model_paths(&OcrConfig::new(dir.path(), "english")).unwrap();
        assert_eq!(det, dir.path().join(DETECTION_MODEL));
        assert_eq!(rec, dir.path().join("en_PP-OCRv5_mobile_rec_infer.mnn"));
        assert_eq!(charset, dir.path().join("ppocr_keys_en.txt"));
    }

    #[test]
    fn falls_back_to_first_available_language() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), DETECTION_MODEL);
        touch(dir.path(), "ppocr_keys_korean.txt");
        touch(dir.path(), "korean_PP-OCRv5_mobile_rec_infer.mnn");

        let (_, rec, _) = get_model_paths(&OcrConfig::new(dir.path(), "latin")).unwrap();
        assert_eq!(rec, dir.path().join("korean_PP-OCRv5_mobile_rec_infer.mnn"));
    }

    #[test]
    fn missing_detection_model_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "latin_PP-OCRv5_mobile_rec_infer.mnn");
        touch(dir.path(), "ppocr_keys_latin.txt");

        let err = get_model_paths(&OcrConfig::new(dir.path(), "latin")).unwrap_err();
        assert!(err.to_string().contains("detection model"));
    }
}

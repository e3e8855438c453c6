// Output file naming.
//
// Every output lands next to the corpus file, named after the corpus file's
// stem so several runs over different corpora never collide:
//
//   classification: <stem>_comment_topics_<model>.json / .xlsx
//   discovery:      <stem>_prompt.txt and <stem>_topics_<model>.txt

use std::path::{Path, PathBuf};

/// Model identifier made safe for a file name: periods become underscores.
pub fn sanitize_model_id(model_id: &str) -> String {
    model_id.replace('.', "_")
}

/// File names derived from one corpus path.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    dir: PathBuf,
    stem: String,
}

impl OutputPaths {
    pub fn for_corpus(corpus: &Path) -> Self {
        let dir = corpus
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stem = corpus
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "corpus".to_string());
        Self { dir, stem }
    }

    fn file(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{}", self.stem, suffix))
    }

    pub fn classification_json(&self, model_id: &str) -> PathBuf {
        self.file(&format!("_comment_topics_{}.json", sanitize_model_id(model_id)))
    }

    pub fn classification_xlsx(&self, model_id: &str) -> PathBuf {
        self.file(&format!("_comment_topics_{}.xlsx", sanitize_model_id(model_id)))
    }

    pub fn discovery_prompt(&self) -> PathBuf {
        self.file("_prompt.txt")
    }

    pub fn discovery_topics(&self, model_id: &str) -> PathBuf {
        self.file(&format!("_topics_{}.txt", sanitize_model_id(model_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_names() {
        let paths = OutputPaths::for_corpus(Path::new("./dataset/braskem_dataset_IG.csv"));
        assert_eq!(
            paths.classification_json("gemini-2.0-flash"),
            PathBuf::from("./dataset/braskem_dataset_IG_comment_topics_gemini-2_0-flash.json")
        );
        assert_eq!(
            paths.classification_xlsx("gemini-2.0-flash"),
            PathBuf::from("./dataset/braskem_dataset_IG_comment_topics_gemini-2_0-flash.xlsx")
        );
    }

    #[test]
    fn test_discovery_names() {
        let paths = OutputPaths::for_corpus(Path::new("data/ig.csv"));
        assert_eq!(paths.discovery_prompt(), PathBuf::from("data/ig_prompt.txt"));
        assert_eq!(
            paths.discovery_topics("gemini-1.5-pro-002"),
            PathBuf::from("data/ig_topics_gemini-1_5-pro-002.txt")
        );
    }

    #[test]
    fn test_bare_file_name_stays_in_current_dir() {
        let paths = OutputPaths::for_corpus(Path::new("comments"));
        assert_eq!(paths.discovery_prompt(), PathBuf::from("comments_prompt.txt"));
    }

    #[test]
    fn test_sanitize_model_id() {
        assert_eq!(sanitize_model_id("o3-mini"), "o3-mini");
        assert_eq!(sanitize_model_id("a.b.c"), "a_b_c");
    }
}

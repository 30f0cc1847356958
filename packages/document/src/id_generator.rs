use crc32fast::Hasher;

use crate::ElementId;

/// Derive a stable seed from a document name using CRC32
pub fn get_document_seed(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for elements within a document
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Document seed (CRC32)
    count: u64,   // Sequential counter
}

impl IdGenerator {
    pub fn new(document_name: &str) -> Self {
        Self {
            seed: get_document_seed(document_name),
            count: 0,
        }
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> ElementId {
        self.count += 1;
        ElementId::new(format!("{}-{}", self.seed, self.count))
    }

    /// Get document seed
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of ids handed out so far
    pub fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_seed_generation() {
        let seed1 = get_document_seed("landing-page");
        let seed2 = get_document_seed("landing-page");

        // Same name always generates same seed
        assert_eq!(seed1, seed2);

        // Different names generate different seeds
        let seed3 = get_document_seed("settings-dialog");
        assert_ne!(seed1, seed3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("landing-page");

        let id1 = gen.new_id();
        let id2 = gen.new_id();
        let id3 = gen.new_id();

        assert!(id1.as_str().ends_with("-1"));
        assert!(id2.as_str().ends_with("-2"));
        assert!(id3.as_str().ends_with("-3"));

        // All share same seed
        let seed = gen.seed();
        assert!(id1.as_str().starts_with(seed));
        assert!(id3.as_str().starts_with(seed));
        assert_eq!(gen.count(), 3);
    }

    #[test]
    fn test_from_seed() {
        let mut gen = IdGenerator::from_seed("doc");
        assert_eq!(gen.new_id().as_str(), "doc-1");
    }
}

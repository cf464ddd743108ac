use async_trait::async_trait;

/// Trait for generating display names for users who did not pick one
#[async_trait]
pub trait DisplayNameGenerator: Send + Sync {
    async fn generate(&self) -> String;
}

/// Pet name-based display name generator
pub struct PetNameGenerator;

impl PetNameGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PetNameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DisplayNameGenerator for PetNameGenerator {
    async fn generate(&self) -> String {
        petname::Petnames::default().generate_one(2, "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_petname_generator() {
        let generator = PetNameGenerator::new();
        let name = generator.generate().await;

        assert!(!name.is_empty());
        let parts: Vec<&str> = name.split('-').collect();
        assert_eq!(parts.len(), 2);
    }
}

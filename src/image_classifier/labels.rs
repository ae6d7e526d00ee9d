/// Class names, one per line, in model output order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Labels {
    names: Vec<String>,
}

impl Labels {
    pub fn parse(text: &str) -> Self {
        Self {
            names: text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Name for output `index` of a model with `num_classes` outputs.
    ///
    /// Label files and models disagree about the leading "background" class
    /// (1001 vs 1000 entries); the offset is taken from the size difference.
    pub fn name(&self, index: usize, num_classes: usize) -> String {
        let position = if self.names.len() == num_classes + 1 {
            Some(index + 1)
        } else if num_classes == self.names.len() + 1 {
            index.checked_sub(1)
        } else {
            Some(index)
        };

        position
            .and_then(|p| self.names.get(p))
            .cloned()
            .unwrap_or_else(|| format!("class_{}", index))
    }
}

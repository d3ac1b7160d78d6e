/// Gallery animation fragments for multi-image cards

/// Style fragments spliced into a template's style block
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Animation {
    /// Zero or more `@keyframes` rules
    pub keyframes: String,
    /// One `.img-N` rule per gallery slot
    pub classes: String,
}

pub trait AnimationGenerator: Send + Sync {
    /// Build the fragments for a gallery of `count` slides.
    fn generate(&self, count: usize) -> Animation;
}

/// Cross-fading carousel: each slide is fully visible for its share of the
/// cycle and hidden otherwise.
#[derive(Debug, Clone)]
pub struct CarouselAnimation {
    /// Seconds each slide stays on screen
    pub slide_seconds: u32,
}

impl Default for CarouselAnimation {
    fn default() -> Self {
        Self { slide_seconds: 3 }
    }
}

impl AnimationGenerator for CarouselAnimation {
    fn generate(&self, count: usize) -> Animation {
        if count <= 1 {
            return Animation {
                keyframes: String::new(),
                classes: ".img-1 { opacity: 1; }".to_string(),
            };
        }

        let cycle = self.slide_seconds as usize * count;
        let step = 100.0 / count as f64;
        // share of each window spent fading in or out
        let fade = step * 0.1;

        let mut keyframes = Vec::with_capacity(count);
        let mut classes = Vec::with_capacity(count);
        for i in 0..count {
            let start = step * i as f64;
            let end = start + step;
            let n = i + 1;
            let rule = if i == 0 {
                format!(
                    "@keyframes fade-{n} {{ 0% {{ opacity: 1; }} {} {{ opacity: 1; }} {} {{ opacity: 0; }} {} {{ opacity: 0; }} 100% {{ opacity: 1; }} }}",
                    pct(end - fade),
                    pct(end),
                    pct(100.0 - fade),
                )
            } else {
                format!(
                    "@keyframes fade-{n} {{ 0% {{ opacity: 0; }} {} {{ opacity: 0; }} {} {{ opacity: 1; }} {} {{ opacity: 1; }} {} {{ opacity: 0; }} 100% {{ opacity: 0; }} }}",
                    pct(start - fade),
                    pct(start),
                    pct(end - fade),
                    pct(end),
                )
            };
            keyframes.push(rule);
            classes.push(format!(
                ".img-{n} {{ animation: fade-{n} {cycle}s infinite; }}"
            ));
        }

        Animation {
            keyframes: keyframes.join("\n        "),
            classes: classes.join("\n        "),
        }
    }
}

fn pct(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}%", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_image_is_static() {
        let a = CarouselAnimation::default().generate(1);
        assert!(a.keyframes.is_empty());
        assert_eq!(a.classes, ".img-1 { opacity: 1; }");
    }

    #[test]
    fn one_rule_per_slot() {
        let a = CarouselAnimation { slide_seconds: 2 }.generate(3);
        assert_eq!(a.keyframes.matches("@keyframes").count(), 3);
        assert_eq!(a.classes.matches(".img-").count(), 3);
        assert!(a.classes.contains(".img-3 { animation: fade-3 6s infinite; }"));
    }

    #[test]
    fn percentages_are_trimmed() {
        assert_eq!(pct(25.0), "25%");
        assert_eq!(pct(33.333333), "33.33%");
    }
}

/// Declarative text burn-in descriptor, rendered as one drawtext directive.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayDescriptor {
    pub text: String,
    pub color: &'static str,
    pub font_size: u32,
    pub boxed: bool,
    pub x: &'static str,
    pub y: &'static str,
}

/// Full filter specification for one reel: a scale directive followed by
/// the ordered overlay descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySpec {
    pub scale_width: u32,
    pub overlays: Vec<OverlayDescriptor>,
}

/// Builds the overlay chain from the optional request texts. Empty fields
/// yield no descriptor; the running elapsed-time overlay is always last.
pub fn compose(
    title: &str,
    emotion_tag: &str,
    caption: &str,
    topic_tag: &str,
    scale_width: u32,
) -> OverlaySpec {
    let mut overlays = Vec::new();

    if !title.is_empty() {
        overlays.push(OverlayDescriptor {
            text: title.to_string(),
            color: "white",
            font_size: 48,
            boxed: true,
            x: "(w-text_w)/2",
            y: "40",
        });
    }
    if !emotion_tag.is_empty() {
        overlays.push(OverlayDescriptor {
            text: emotion_tag.to_string(),
            color: "yellow",
            font_size: 32,
            boxed: false,
            x: "w-text_w-20",
            y: "20",
        });
    }
    if !caption.is_empty() {
        overlays.push(OverlayDescriptor {
            text: caption.to_string(),
            color: "white",
            font_size: 36,
            boxed: false,
            x: "(w-text_w)/2",
            y: "h-text_h-60",
        });
    }
    if !topic_tag.is_empty() {
        overlays.push(OverlayDescriptor {
            text: topic_tag.to_string(),
            color: "cyan",
            font_size: 28,
            boxed: false,
            x: "20",
            y: "h-text_h-20",
        });
    }

    // Elapsed time hh:mm:ss, bottom-right. The colon gets escaped into the
    // drawtext expansion form together with the free-text escaping below.
    overlays.push(OverlayDescriptor {
        text: "%{pts:hms}".to_string(),
        color: "white",
        font_size: 24,
        boxed: false,
        x: "w-text_w-20",
        y: "h-text_h-20",
    });

    OverlaySpec {
        scale_width,
        overlays,
    }
}

impl OverlaySpec {
    /// Renders the comma-joined filter chain. Height -2 keeps the aspect
    /// ratio with even dimensions, which yuv420p requires.
    pub fn to_filter_chain(&self) -> String {
        let mut directives = vec![format!("scale={}:-2", self.scale_width)];
        for overlay in &self.overlays {
            let mut directive = format!(
                "drawtext=text='{}':fontsize={}:fontcolor={}:x={}:y={}",
                escape_text(&overlay.text),
                overlay.font_size,
                overlay.color,
                overlay.x,
                overlay.y
            );
            if overlay.boxed {
                directive.push_str(":box=1:boxcolor=black@0.5:boxborderw=10");
            }
            directives.push(directive);
        }
        directives.join(",")
    }
}

/// Neutralizes characters that would terminate or corrupt a drawtext
/// directive inside a quoted, comma-joined filter chain.
fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\'', "'\\''")
        .replace(':', "\\:")
        .replace(',', "\\,")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_yield_no_descriptor() {
        let spec = compose("", "", "", "", 720);
        assert_eq!(spec.overlays.len(), 1);
        assert_eq!(spec.overlays[0].text, "%{pts:hms}");
    }

    #[test]
    fn all_fields_populate_in_layout_order() {
        let spec = compose("Title", "joy", "Once upon a time", "travel", 720);
        let texts: Vec<&str> = spec.overlays.iter().map(|o| o.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Title", "joy", "Once upon a time", "travel", "%{pts:hms}"]
        );
        assert!(spec.overlays[0].boxed);
        assert_eq!(spec.overlays[1].color, "yellow");
        assert_eq!(spec.overlays[3].color, "cyan");
    }

    #[test]
    fn chain_starts_with_even_dimension_scale() {
        let chain = compose("Title", "", "", "", 720).to_filter_chain();
        assert!(chain.starts_with("scale=720:-2,drawtext="));
    }

    #[test]
    fn timestamp_overlay_is_always_last() {
        let chain = compose("", "joy", "", "", 720).to_filter_chain();
        assert!(chain.ends_with(":x=w-text_w-20:y=h-text_h-20"));
        assert!(chain.contains("drawtext=text='%{pts\\:hms}'"));
    }

    #[test]
    fn free_text_is_escaped_for_filter_syntax() {
        let chain = compose("it's 10:00, right", "", "", "", 720).to_filter_chain();
        assert!(chain.contains("text='it'\\''s 10\\:00\\, right'"));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    Facebook,
    Twitter,
    WhatsApp,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 3] = [Self::Facebook, Self::Twitter, Self::WhatsApp];

    /// Class carried by the platform's anchor inside `.social-share`.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
            Self::WhatsApp => "whatsapp",
        }
    }

    pub fn from_class_list<'a>(mut classes: impl Iterator<Item = &'a str>) -> Option<Self> {
        classes.find_map(|class| {
            Self::ALL
                .into_iter()
                .find(|platform| platform.class_name() == class)
        })
    }

    pub fn intent_url(self, share_url: &str, title: &str) -> String {
        let url = encode_component(share_url);
        let text = encode_component(title);
        match self {
            Self::Facebook => format!("https://www.facebook.com/sharer/sharer.php?u={url}"),
            Self::Twitter => format!("https://twitter.com/intent/tweet?url={url}&text={text}"),
            Self::WhatsApp => format!("https://wa.me/?text={text}%20{url}"),
        }
    }
}

fn encode_component(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

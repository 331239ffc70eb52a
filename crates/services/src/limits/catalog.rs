use serde::Serialize;

/// A well-known app offered in the picker UI, with a sensible default daily
/// limit in minutes.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PredefinedApp {
    pub name: &'static str,
    pub icon: &'static str,
    pub category: &'static str,
    pub default_limit: i32,
    pub url: &'static str,
}

/// Static catalog. Teenagers can hide entries and add their own custom apps
/// alongside it.
pub fn predefined_apps() -> &'static [PredefinedApp] {
    &PREDEFINED_APPS
}

const PREDEFINED_APPS: [PredefinedApp; 18] = [
    PredefinedApp {
        name: "YouTube",
        icon: "📺",
        category: "Entertainment",
        default_limit: 60,
        url: "https://www.youtube.com",
    },
    PredefinedApp {
        name: "Instagram",
        icon: "📷",
        category: "Social Media",
        default_limit: 45,
        url: "https://www.instagram.com",
    },
    PredefinedApp {
        name: "TikTok",
        icon: "🎵",
        category: "Social Media",
        default_limit: 60,
        url: "https://www.tiktok.com",
    },
    PredefinedApp {
        name: "Facebook",
        icon: "👥",
        category: "Social Media",
        default_limit: 30,
        url: "https://www.facebook.com",
    },
    PredefinedApp {
        name: "Snapchat",
        icon: "👻",
        category: "Social Media",
        default_limit: 30,
        url: "https://www.snapchat.com",
    },
    PredefinedApp {
        name: "Twitter",
        icon: "🐦",
        category: "Social Media",
        default_limit: 30,
        url: "https://www.twitter.com",
    },
    PredefinedApp {
        name: "WhatsApp",
        icon: "💬",
        category: "Communication",
        default_limit: 60,
        url: "https://web.whatsapp.com",
    },
    PredefinedApp {
        name: "Discord",
        icon: "💬",
        category: "Communication",
        default_limit: 90,
        url: "https://discord.com",
    },
    PredefinedApp {
        name: "Games",
        icon: "🎮",
        category: "Gaming",
        default_limit: 120,
        url: "https://www.crazygames.com",
    },
    PredefinedApp {
        name: "Netflix",
        icon: "🎬",
        category: "Entertainment",
        default_limit: 90,
        url: "https://www.netflix.com",
    },
    PredefinedApp {
        name: "Spotify",
        icon: "🎵",
        category: "Music",
        default_limit: 120,
        url: "https://open.spotify.com",
    },
    PredefinedApp {
        name: "Reddit",
        icon: "🤖",
        category: "Social Media",
        default_limit: 45,
        url: "https://www.reddit.com",
    },
    PredefinedApp {
        name: "Pinterest",
        icon: "📌",
        category: "Social Media",
        default_limit: 30,
        url: "https://www.pinterest.com",
    },
    PredefinedApp {
        name: "Twitch",
        icon: "🎮",
        category: "Gaming",
        default_limit: 90,
        url: "https://www.twitch.tv",
    },
    PredefinedApp {
        name: "Roblox",
        icon: "🎮",
        category: "Gaming",
        default_limit: 60,
        url: "https://www.roblox.com",
    },
    PredefinedApp {
        name: "Minecraft",
        icon: "⛏️",
        category: "Gaming",
        default_limit: 90,
        url: "https://www.minecraft.net",
    },
    PredefinedApp {
        name: "Fortnite",
        icon: "🎯",
        category: "Gaming",
        default_limit: 60,
        url: "https://www.epicgames.com/fortnite",
    },
    PredefinedApp {
        name: "Call of Duty",
        icon: "🔫",
        category: "Gaming",
        default_limit: 60,
        url: "https://www.callofduty.com",
    },
];

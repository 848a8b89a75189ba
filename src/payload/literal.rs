//! Zero-sized types that (de)serialize as one fixed string.
//!
//! Several payload shapes share the same `type` tag and differ only by other
//! fixed fields (template name, language). Encoding those fields as types
//! makes strict deserialization itself reject the wrong shape.

macro_rules! literal {
    ($($(#[$meta:meta])* $name:ident => $value:literal;)+) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl $name {
            /// The only accepted value.
            pub const VALUE: &'static str = $value;
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(Self::VALUE)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <String as serde::Deserialize>::deserialize(deserializer)?;
                if value == Self::VALUE {
                    Ok(Self)
                } else {
                    Err(serde::de::Error::invalid_value(
                        serde::de::Unexpected::Str(&value),
                        &Self::VALUE,
                    ))
                }
            }
        }
    )+};
}

literal! {
    /// `type = "text"`
    Text => "text";
    /// `type = "list"`
    List => "list";
    /// `type = "button"`
    Button => "button";
    /// `type = "media"`
    Media => "media";
    /// `type = "product"`
    Product => "product";
    /// `type = "template"`
    Template => "template";
    /// `mediaType = "image"`
    Image => "image";
    /// `templateLang = "en"`
    English => "en";
    /// `headerType = "text"` on templates
    TextHeader => "text";
    /// Booking data template
    BookingData => "cnc_booking_data";
    /// Two-card carousel template
    Carousel2 => "cnc_botai_carousel_2";
    /// Three-card carousel template
    Carousel3 => "cnc_carouselx_3_a";
    /// Four-card carousel template
    Carousel4 => "cnc_carouselx_4_a";
    /// Five-card carousel template
    Carousel5 => "cnc_carouselx_5_a";
}

//! Fixed showcase content: slideshow, quick stats and nearby technicians.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub image: &'static str,
    pub caption: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub value: &'static str,
    pub label: &'static str,
    /// CSS modifier for the icon colour.
    pub accent: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Technician {
    pub name: &'static str,
    pub skill: &'static str,
    pub distance_km: u32,
    pub rating: f32,
}

pub const SLIDES: [Slide; 4] = [
    Slide { image: "/phone-repair1.jpg", caption: "Expert Phone Repair" },
    Slide { image: "/laptop-repair.jpg", caption: "Laptop & PC Services" },
    Slide { image: "/plumbing2.jpg", caption: "Plumbing Solutions" },
    Slide { image: "/Electrician2.jpg", caption: "Professional Electricians" },
];

pub const STATS: [Stat; 4] = [
    Stat { value: "24", label: "Jobs Completed", accent: "yellow" },
    Stat { value: "5", label: "Pending Requests", accent: "blue" },
    Stat { value: "12", label: "Technicians Nearby", accent: "green" },
    Stat { value: "4.7", label: "Avg. Rating", accent: "pink" },
];

pub const TECHNICIANS: [Technician; 3] = [
    Technician { name: "John Doe", skill: "Plumber", distance_km: 5, rating: 4.5 },
    Technician { name: "Mary Smith", skill: "Electrician", distance_km: 2, rating: 4.8 },
    Technician { name: "James Lee", skill: "Phone Repair", distance_km: 8, rating: 4.3 },
];

/// Position in the slideshow. Any integer maps onto a slide, so prev/next
/// wrap around in both directions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SlideIndex(usize);

impl SlideIndex {
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub const fn wrap(requested: i64) -> Self {
        Self(requested.rem_euclid(SLIDES.len() as i64) as usize)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    #[must_use]
    pub const fn slide(self) -> &'static Slide {
        &SLIDES[self.0]
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self((self.0 + 1) % SLIDES.len())
    }

    #[must_use]
    pub const fn prev(self) -> Self {
        Self((self.0 + SLIDES.len() - 1) % SLIDES.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_wrap_both_ways() {
        assert_eq!(SlideIndex::wrap(0).get(), 0);
        assert_eq!(SlideIndex::wrap(5).get(), 1);
        assert_eq!(SlideIndex::wrap(-1).get(), 3);
        assert_eq!(SlideIndex::wrap(i64::MIN).get(), 0);

        assert_eq!(SlideIndex::wrap(3).next().get(), 0);
        assert_eq!(SlideIndex::wrap(0).prev().get(), 3);
    }

    #[test]
    fn showcase_content() {
        assert_eq!(SlideIndex::default().slide().caption, "Expert Phone Repair");
        assert_eq!(STATS.map(|s| s.value), ["24", "5", "12", "4.7"]);
        assert_eq!(TECHNICIANS[1].name, "Mary Smith");
        assert!((TECHNICIANS[1].rating - 4.8).abs() < f32::EPSILON);
    }
}

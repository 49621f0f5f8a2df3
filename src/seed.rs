use crate::profile::{Coordinates, Profile};

/// Profiles the directory starts with.
pub fn initial_profiles() -> Vec<Profile> {
    vec![
        Profile {
            id: 1,
            name: "John Doe".to_owned(),
            description: "Software Engineer".to_owned(),
            address: "San Francisco, CA".to_owned(),
            image: "https://randomuser.me/api/portraits/men/1.jpg".to_owned(),
            coordinates: Coordinates::new(-122.4194, 37.7749),
        },
        Profile {
            id: 2,
            name: "Jane Smith".to_owned(),
            description: "Product Manager".to_owned(),
            address: "New York, NY".to_owned(),
            image: "https://randomuser.me/api/portraits/women/2.jpg"
                .to_owned(),
            coordinates: Coordinates::new(-74.006, 40.7128),
        },
        Profile {
            id: 3,
            name: "Carlos Rivera".to_owned(),
            description: "UX Designer".to_owned(),
            address: "Austin, TX".to_owned(),
            image: "https://randomuser.me/api/portraits/men/3.jpg".to_owned(),
            coordinates: Coordinates::new(-97.7431, 30.2672),
        },
        Profile {
            id: 4,
            name: "Mei Chen".to_owned(),
            description: "Data Scientist".to_owned(),
            address: "Seattle, WA".to_owned(),
            image: "https://randomuser.me/api/portraits/women/4.jpg"
                .to_owned(),
            coordinates: Coordinates::new(-122.3321, 47.6062),
        },
    ]
}

//! Fixture data loaded by the seed service.

use crate::domain::{CreateProduct, Gender, UserRole};

pub struct SeedUser {
    pub email: &'static str,
    pub full_name: &'static str,
    pub password: &'static str,
    pub roles: &'static [UserRole],
}

pub struct SeedProduct {
    pub title: &'static str,
    pub description: &'static str,
    pub price: f64,
    pub stock: i32,
    pub sizes: &'static [&'static str],
    pub gender: Gender,
    pub tags: &'static [&'static str],
    pub images: &'static [&'static str],
}

impl SeedProduct {
    /// Shape the fixture as a regular creation request so slugging stays in one place.
    pub fn to_create(&self) -> CreateProduct {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        CreateProduct {
            title: self.title.to_string(),
            price: Some(self.price),
            description: Some(self.description.to_string()),
            slug: None,
            stock: Some(self.stock),
            sizes: owned(self.sizes),
            gender: self.gender,
            tags: Some(owned(self.tags)),
            images: Some(owned(self.images)),
        }
    }
}

/// The first user owns every seeded product.
pub const USERS: &[SeedUser] = &[
    SeedUser {
        email: "test1@google.com",
        full_name: "Test One",
        password: "Abc123",
        roles: &[UserRole::Admin],
    },
    SeedUser {
        email: "test2@google.com",
        full_name: "Test Two",
        password: "Abc123",
        roles: &[UserRole::User, UserRole::SuperUser],
    },
];

pub const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        title: "Men's Chill Crew Neck Sweatshirt",
        description: "Introducing the Tesla Chill Collection. The Men's Chill Crew Neck Sweatshirt has a premium, heavyweight exterior and soft fleece interior for comfort in any season.",
        price: 75.0,
        stock: 7,
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        gender: Gender::Men,
        tags: &["sweatshirt"],
        images: &["1740176-00-A_0_2000.jpg", "1740176-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Men's Quilted Shirt Jacket",
        description: "The Men's Quilted Shirt Jacket features a uniquely fit, quilted design for warmth and mobility in cold weather seasons.",
        price: 200.0,
        stock: 5,
        sizes: &["XS", "S", "M", "XL", "XXL"],
        gender: Gender::Men,
        tags: &["jacket"],
        images: &["1740507-00-A_0_2000.jpg", "1740507-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Men's Raven Lightweight Zip Up Bomber Jacket",
        description: "Introducing the Tesla Raven Collection. The Men's Raven Lightweight Zip Up Bomber has a premium, modern silhouette made from a sustainable bamboo cotton blend for versatility in any season.",
        price: 130.0,
        stock: 10,
        sizes: &["S", "M", "L", "XL", "XXL"],
        gender: Gender::Men,
        tags: &["shirt"],
        images: &["1740250-00-A_0_2000.jpg", "1740250-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Men's Turbine Long Sleeve Tee",
        description: "Introducing the Tesla Turbine Collection. Designed for style, comfort and everyday lifestyle, the Men's Turbine Long Sleeve Tee features a subtle, water-based T logo on the left chest.",
        price: 45.0,
        stock: 50,
        sizes: &["XS", "S", "M", "L"],
        gender: Gender::Men,
        tags: &["shirt"],
        images: &["1740280-00-A_0_2000.jpg", "1740280-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Men's Turbine Short Sleeve Tee",
        description: "Introducing the Tesla Turbine Collection. Designed for style, comfort and everyday lifestyle, the Men's Turbine Short Sleeve Tee features a subtle, water-based Tesla wordmark across the chest.",
        price: 40.0,
        stock: 50,
        sizes: &["M", "L", "XL", "XXL"],
        gender: Gender::Men,
        tags: &["shirt"],
        images: &["1741416-00-A_0_2000.jpg", "1741416-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Women's Cropped Puffer Jacket",
        description: "The Women's Cropped Puffer Jacket features a uniquely cropped silhouette for the perfect, modern style while on the go during the cozy season ahead.",
        price: 225.0,
        stock: 85,
        sizes: &["XS", "S", "M"],
        gender: Gender::Women,
        tags: &["hoodie"],
        images: &["1740535-00-A_0_2000.jpg", "1740535-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Women's Chill Half Zip Cropped Hoodie",
        description: "Introducing the Tesla Chill Collection. The Women's Chill Half Zip Cropped Hoodie has a premium, soft fleece exterior and cropped silhouette for comfort in everyday lifestyle.",
        price: 130.0,
        stock: 10,
        sizes: &["XS", "S", "M", "XXL"],
        gender: Gender::Women,
        tags: &["hoodie"],
        images: &["1740226-00-A_0_2000.jpg", "1740226-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Women's Raven Slouchy Crew Sweatshirt",
        description: "Introducing the Tesla Raven Collection. The Women's Raven Slouchy Crew Sweatshirt has a premium, relaxed silhouette made from a sustainable bamboo cotton blend.",
        price: 110.0,
        stock: 9,
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        gender: Gender::Women,
        tags: &["hoodie"],
        images: &["1740260-00-A_0_2000.jpg", "1740260-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Kids Cybertruck Long Sleeve Tee",
        description: "Designed for fit, comfort and style, the Kids Cybertruck Graffiti Long Sleeve Tee features a water-based Cybertruck graffiti wordmark across the chest.",
        price: 30.0,
        stock: 10,
        sizes: &["XS", "S", "M"],
        gender: Gender::Kid,
        tags: &["shirt"],
        images: &["1742707-00-A_0_2000.jpg", "1742707-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Kids Scribble T Logo Tee",
        description: "The Kids Scribble T Logo Tee highlights the Tesla T logo in a playful scribble print, made from soft cotton for everyday wear.",
        price: 25.0,
        stock: 0,
        sizes: &["XS", "S", "M"],
        gender: Gender::Kid,
        tags: &["shirt"],
        images: &["8529312-00-A_0_2000.jpg", "8529312-00-A_1.jpg"],
    },
    SeedProduct {
        title: "Made on Earth by Humans Onesie",
        description: "Show your commitment to sustainable energy with this cheeky onesie for your young one. Note: Does not prevent emissions. 100% Cotton. Made in Peru.",
        price: 30.0,
        stock: 16,
        sizes: &["XS", "S"],
        gender: Gender::Kid,
        tags: &["shirt"],
        images: &["1473809-00-A_1_2000.jpg", "1473809-00-A_alt.jpg"],
    },
    SeedProduct {
        title: "3D Large Wordmark Tee",
        description: "Designed for fit, comfort and style, the Tesla 3D Large Wordmark Tee is made from 100% Peruvian cotton with a 3D silicone-printed Tesla wordmark printed across the chest.",
        price: 35.0,
        stock: 15,
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        gender: Gender::Unisex,
        tags: &["shirt"],
        images: &["8764734-00-A_0_2000.jpg", "8764734-00-A_1.jpg"],
    },
];

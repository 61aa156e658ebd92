//! Static concept pools, one per topic.
//!
//! Each entry is a description handed to the lesson generator and doubles as
//! the concept cache key. Pools are built once on first use.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::model::Topic;

// Distinct, non-stacking objects so counts stay readable.
const EASY_TO_COUNT_OBJECTS: &[&str] = &[
    "Red Apples",
    "Green Pears",
    "Yellow Lemons",
    "Oranges",
    "Bananas",
    "Strawberries",
    "Eggs",
    "Cupcakes",
    "Toy Cars",
    "Tennis Balls",
    "Soccer Balls",
    "Baseballs",
    "Spoons",
    "Forks",
    "Keys",
    "Coins",
    "Buttons",
    "Shoes",
    "Socks",
    "Rubber Ducks",
    "Teddy Bears",
    "Pencils",
    "Crayons",
    "Cookies",
    "Donuts",
];

const NATURAL_COLORS: &[&str] = &[
    "Red", "Green", "Blue", "Yellow", "Brown", "White", "Black", "Orange", "Purple", "Pink",
];

const REAL_FRUITS: &[&str] = &[
    "Apple",
    "Banana",
    "Orange",
    "Pear",
    "Strawberry",
    "Blueberry",
    "Grape",
    "Watermelon",
    "Lemon",
    "Peach",
    "Cherry",
    "Pineapple",
    "Mango",
    "Coconut",
    "Kiwi",
    "Plum",
    "Avocado",
    "Melon",
    "Raspberry",
    "Blackberry",
];

const REAL_VEGETABLES: &[&str] = &[
    "Carrot",
    "Broccoli",
    "Cucumber",
    "Tomato",
    "Potato",
    "Corn",
    "Onion",
    "Pumpkin",
    "Peas",
    "Pepper",
    "Lettuce",
    "Mushroom",
    "Bean",
    "Spinach",
    "Celery",
    "Radish",
    "Eggplant",
    "Cabbage",
    "Garlic",
    "Sweet Potato",
];

const FARM_ANIMALS: &[&str] = &[
    "Cow", "Pig", "Sheep", "Horse", "Chicken", "Duck", "Goat", "Rabbit", "Cat", "Dog", "Donkey",
    "Turkey", "Goose", "Mouse", "Pony", "Llama", "Rooster", "Hen",
];

const WILD_ANIMALS: &[&str] = &[
    "Lion",
    "Elephant",
    "Giraffe",
    "Zebra",
    "Monkey",
    "Bear",
    "Hippo",
    "Tiger",
    "Turtle",
    "Frog",
    "Butterfly",
    "Fish",
    "Bird",
    "Deer",
    "Fox",
    "Wolf",
    "Panda",
    "Koala",
    "Kangaroo",
    "Gorilla",
    "Rhino",
    "Penguin",
    "Seal",
    "Camel",
    "Owl",
    "Squirrel",
    "Dolphin",
    "Whale",
    "Polar Bear",
    "Cheetah",
];

const EVERYDAY_OBJECTS: &[&str] = &[
    "Cup",
    "Plate",
    "Bowl",
    "Spoon",
    "Fork",
    "Chair",
    "Table",
    "Bed",
    "Pillow",
    "Blanket",
    "Lamp",
    "Book",
    "Car",
    "Ball",
    "Doll",
    "Block",
    "Shoe",
    "Sock",
    "Shirt",
    "Pants",
    "Hat",
    "Coat",
    "Brush",
    "Soap",
    "Towel",
    "Door",
    "Window",
    "Flower",
    "Tree",
    "Sun",
    "Moon",
    "Star",
    "Cloud",
    "Leaf",
    "Grass",
    "Rock",
    "Stick",
    "Key",
    "Phone",
    "Clock",
    "Box",
    "Bag",
    "Bottle",
    "Pencil",
    "Crayon",
    "Paper",
    "Basket",
    "Rug",
    "Teddy Bear",
    "Drum",
];

const SHAPES: &[&str] = &["Circle", "Square", "Triangle", "Star", "Heart", "Rectangle", "Oval"];

const REAL_WORLD_SHAPES: &[(&str, &[&str])] = &[
    ("Circle", &["Plate", "Coin", "Clock", "Button", "Wheel", "Cookie", "Pizza"]),
    ("Square", &["Window", "Box", "Book", "Frame", "Table"]),
    ("Triangle", &["Slice of Pizza", "Roof", "Tent", "Sandwich half"]),
    ("Star", &["Starfish", "Star fruit", "Decoration"]),
    ("Heart", &["Cookie", "Leaf", "Balloon"]),
    ("Rectangle", &["Door", "Phone", "Envelope", "Rug", "Flag"]),
    ("Oval", &["Egg", "Mirror", "Rug", "Balloon"]),
];

// Concrete nouns only.
const ALPHABET_WORDS: &[(char, &[&str])] = &[
    ('A', &["Alligator", "Ant", "Apple", "Airplane", "Arrow"]),
    ('B', &["Baby", "Ball", "Bird", "Blocks", "Book", "Bear", "Boat", "Bus", "Banana", "Balloon"]),
    ('C', &["Car", "Cat", "Cow", "Cup", "Cookie", "Cake", "Clock", "Chair"]),
    ('D', &["Dog", "Doll", "Duck", "Dad", "Door", "Drum", "Donut"]),
    ('E', &["Ear", "Egg", "Elephant", "Eye", "Eagle"]),
    ('F', &["Farm", "Fish", "Flower", "Food", "Fork", "Frog", "Fan"]),
    ('G', &["Garden", "Giraffe", "Grape", "Grass", "Goat", "Gate", "Guitar"]),
    ('H', &["Hair", "Hand", "Hat", "Head", "House", "Horse", "Heart", "Helicopter"]),
    ('I', &["Ice Cream", "Igloo", "Island", "Insect", "Ice"]),
    ('J', &["Jacket", "Jam", "Jar", "Juice", "Jeep", "Jellyfish"]),
    ('K', &["Kangaroo", "Key", "Kite", "King", "Koala", "Kiwi"]),
    ('L', &["Ladybug", "Lamb", "Lion", "Leaf", "Leg", "Lamp", "Lemon"]),
    ('M', &["Mom", "Milk", "Moon", "Mouth", "Mouse", "Monkey", "Mushroom"]),
    ('N', &["Nest", "Nose", "Net", "Necklace", "Nut"]),
    ('O', &["Ocean", "Orange", "Owl", "Octopus", "Onion"]),
    ('P', &["Paint", "Park", "Pig", "Pen", "Pan", "Pizza", "Pumpkin", "Pencil", "Pillow"]),
    ('Q', &["Queen", "Quilt", "Question"]),
    ('R', &["Rabbit", "Rain", "Ring", "Rose", "Robot", "Rainbow", "Rocket"]),
    ('S', &["Sandwich", "School", "Sun", "Star", "Shoe", "Spoon", "Sock", "Soap", "Snake"]),
    ('T', &["Tiger", "Tree", "Turtle", "Table", "Truck", "Train", "Tomato", "Tent"]),
    ('U', &["Umbrella", "Unicorn", "Uniform"]),
    ('V', &["Vase", "Violin", "Van", "Vegetable", "Vest"]),
    ('W', &["Water", "Whale", "Watch", "Window", "Wheel", "Wagon"]),
    ('X', &["X-ray", "Xylophone"]),
    ('Y', &["Yarn", "Yo-yo", "Yellow", "Yogurt", "Yak"]),
    ('Z', &["Zebra", "Zoo", "Zipper", "Zero"]),
];

static POOLS: LazyLock<HashMap<Topic, Vec<String>>> = LazyLock::new(|| {
    Topic::ALL
        .into_iter()
        .map(|topic| (topic, build_pool(topic)))
        .collect()
});

/// Concept descriptions for `topic`.
#[must_use]
pub fn pool(topic: Topic) -> &'static [String] {
    POOLS.get(&topic).map_or(&[], Vec::as_slice)
}

fn build_pool(topic: Topic) -> Vec<String> {
    match topic {
        Topic::Numbers => number_concepts(),
        Topic::Alphabet => alphabet_concepts(),
        Topic::Colors => color_concepts(),
        Topic::Fruits => food_concepts(REAL_FRUITS),
        Topic::Vegetables => food_concepts(REAL_VEGETABLES),
        Topic::FarmAnimals => animal_concepts(FARM_ANIMALS),
        Topic::WildAnimals => animal_concepts(WILD_ANIMALS),
        Topic::Shapes => shape_concepts(),
        Topic::Objects => object_concepts(EVERYDAY_OBJECTS),
    }
}

fn number_concepts() -> Vec<String> {
    let mut list = Vec::with_capacity(20 * EASY_TO_COUNT_OBJECTS.len());
    for n in 1..=20 {
        let layout = if n > 10 { "in a neat grid" } else { "in a line" };
        for obj in EASY_TO_COUNT_OBJECTS {
            list.push(format!("Number {n} shown with {n} real {obj} arranged {layout}"));
        }
    }
    list
}

fn alphabet_concepts() -> Vec<String> {
    let mut list = Vec::new();
    for (letter, words) in ALPHABET_WORDS {
        for word in *words {
            list.push(format!("Letter {letter} shown with a real {word}"));
            list.push(format!("Letter {letter} wooden block next to a real {word}"));
        }
    }
    list
}

fn color_concepts() -> Vec<String> {
    NATURAL_COLORS
        .iter()
        .flat_map(|color| {
            EVERYDAY_OBJECTS
                .iter()
                .map(move |obj| format!("A real {color} {obj}"))
        })
        .collect()
}

fn shape_concepts() -> Vec<String> {
    let generic = SHAPES.iter().flat_map(|shape| {
        NATURAL_COLORS
            .iter()
            .map(move |color| format!("A {color} {shape} shape"))
    });
    let real_world = REAL_WORLD_SHAPES.iter().flat_map(|(shape, examples)| {
        examples
            .iter()
            .map(move |ex| format!("A real {ex} shaped like a {shape}"))
    });
    generic.chain(real_world).collect()
}

fn with_variations(base: &[&str], prefixes: &[&str]) -> Vec<String> {
    base.iter()
        .flat_map(|item| prefixes.iter().map(move |p| format!("A {p} {item}")))
        .collect()
}

fn food_concepts(base: &[&str]) -> Vec<String> {
    with_variations(base, &["real", "sliced", "whole"])
}

fn animal_concepts(base: &[&str]) -> Vec<String> {
    with_variations(base, &["real", "baby", "cute"])
}

fn object_concepts(base: &[&str]) -> Vec<String> {
    with_variations(base, &["real", "colorful", "wooden"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_topic_has_a_pool() {
        for topic in Topic::ALL {
            assert!(!pool(topic).is_empty(), "{topic} pool is empty");
        }
    }

    #[test]
    fn pool_sizes_follow_generators() {
        assert_eq!(pool(Topic::Numbers).len(), 20 * 25);
        assert_eq!(pool(Topic::Colors).len(), 10 * 50);
        assert_eq!(pool(Topic::FarmAnimals).len(), 18 * 3);
        assert_eq!(pool(Topic::Shapes).len(), 7 * 10 + 31);
    }

    #[test]
    fn number_layout_switches_above_ten() {
        let numbers = pool(Topic::Numbers);
        let has = |concept: &str| numbers.iter().any(|c| c == concept);
        assert!(has("Number 3 shown with 3 real Eggs arranged in a line"));
        assert!(has("Number 12 shown with 12 real Eggs arranged in a neat grid"));
    }

    #[test]
    fn alphabet_has_two_phrasings_per_word() {
        let letters = pool(Topic::Alphabet);
        assert!(letters.contains(&"Letter S shown with a real Sun".to_string()));
        assert!(letters.contains(&"Letter S wooden block next to a real Sun".to_string()));
    }
}

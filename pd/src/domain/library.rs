//! The reading list shown in the library view

/// One recommended book
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Book {
    pub title: &'static str,
    pub author: &'static str,
    pub note: &'static str,
    pub category: &'static str,
}

pub static BOOKS: [Book; 5] = [
    Book {
        title: "The Design of Everyday Things",
        author: "Don Norman",
        note: "The bible of usability. It explains why complexity is usually a design failure, not a user failure.",
        category: "Design",
    },
    Book {
        title: "Inspired",
        author: "Marty Cagan",
        note: "Essential for understanding how modern product teams actually work, stripped of the corporate theater.",
        category: "Product Management",
    },
    Book {
        title: "Simple and Usable",
        author: "Giles Colborne",
        note: "A masterclass in reduction. It teaches you how to remove, hide, and displace complexity.",
        category: "Strategy",
    },
    Book {
        title: "Art as Experience",
        author: "John Dewey",
        note: "Helps connect the digital 'user flow' to the human 'experience.' Learning as an aesthetic process.",
        category: "Philosophy",
    },
    Book {
        title: "Escaping the Build Trap",
        author: "Melissa Perri",
        note: "Why shipping features isn't the same as creating value. Perfect for non-PMs to hold teams accountable.",
        category: "Product Management",
    },
];

/// Books in a category, case-insensitive; `None` returns everything
pub fn books_in(category: Option<&str>) -> Vec<&'static Book> {
    BOOKS
        .iter()
        .filter(|b| category.is_none_or(|c| b.category.eq_ignore_ascii_case(c)))
        .collect()
}

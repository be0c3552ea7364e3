//! The bundled default content tree.
//!
//! This is the zero-infrastructure fallback: the memory store serves it
//! directly, the file and remote stores seed from it and degrade to it when
//! a load fails. It is constructed explicitly and handed to adapters at
//! construction time; nothing reaches for it through a global.

use crate::content::{ContentTree, Fields, Node};
use crate::fields;

/// Build the default bilingual tree. Both branches are structurally
/// isomorphic; only leaf strings differ.
pub fn default_tree() -> ContentTree {
    ContentTree::new(english_sections(), bengali_sections())
}

fn english_sections() -> Fields {
    fields! {
        "hero" => Node::Group(fields! {
            "title" => Node::text("Hi, I'm Suman"),
            "subtitle" => Node::text("Full-stack developer & designer"),
            "image" => Node::text("https://placehold.co/960x540"),
            "ctaText" => Node::text("Get in touch"),
        }),
        "about" => Node::Group(fields! {
            "bio" => Node::text(
                "I build bilingual web experiences end to end, from the database to the last \
                 pixel, and I care about the details in both languages.",
            ),
            "mission" => Node::text(
                "Make the web feel native to Bengali speakers without compromising for anyone else.",
            ),
            "avatar" => Node::text("https://placehold.co/320x320"),
            "tags" => Node::TextList(vec![
                "web".to_string(),
                "design".to_string(),
                "bengali".to_string(),
            ]),
        }),
        "experience" => Node::Group(fields! {
            "heading" => Node::text("Where I've worked"),
            "jobs" => Node::ItemList(vec![
                fields! {
                    "role" => Node::text("Senior Engineer"),
                    "company" => Node::text("Dhaka Digital"),
                    "period" => Node::text("2021 - Present"),
                    "responsibilities" => Node::TextList(vec![
                        "Lead the storefront rebuild".to_string(),
                        "Mentor four engineers".to_string(),
                    ]),
                },
                fields! {
                    "role" => Node::text("Web Developer"),
                    "company" => Node::text("Freelance"),
                    "period" => Node::text("2018 - 2021"),
                    "responsibilities" => Node::TextList(vec![
                        "Shipped client sites".to_string(),
                    ]),
                },
            ]),
        }),
        "services" => Node::Group(fields! {
            "heading" => Node::text("What I do"),
            "items" => Node::ItemList(vec![
                fields! {
                    "icon" => Node::text("web"),
                    "title" => Node::text("Web Development"),
                    "description" => Node::text(
                        "Fast, accessible sites built with modern tooling and measured by real \
                         user metrics.",
                    ),
                },
                fields! {
                    "icon" => Node::text("pen"),
                    "title" => Node::text("Brand Design"),
                    "description" => Node::text("Identity systems that survive contact with reality."),
                },
            ]),
        }),
        "pricing" => Node::Group(fields! {
            "heading" => Node::text("Packages"),
            "packages" => Node::ItemList(vec![
                fields! {
                    "name" => Node::text("Starter"),
                    "price" => Node::text("$499"),
                    "features" => Node::TextList(vec![
                        "One-page site".to_string(),
                        "Two revisions".to_string(),
                    ]),
                    "popular" => Node::Flag(false),
                },
                fields! {
                    "name" => Node::text("Studio"),
                    "price" => Node::text("$1999"),
                    "features" => Node::TextList(vec![
                        "Full site".to_string(),
                        "Bilingual content".to_string(),
                        "Three months of support".to_string(),
                    ]),
                    "popular" => Node::Flag(true),
                },
            ]),
        }),
        "blog" => Node::Group(fields! {
            "heading" => Node::text("Writing"),
            "posts" => Node::ItemList(vec![
                fields! {
                    "title" => Node::text("Typesetting Bengali on the web"),
                    "excerpt" => Node::text("What breaks, what works, and what to ship."),
                    "content" => Node::text(
                        "Bengali text rendering has improved a lot, but the defaults still \
                         fail in interesting ways. This post walks through the font stacks, \
                         line-height quirks and conjunct handling I settled on.",
                    ),
                    "image" => Node::text("https://placehold.co/800x450"),
                    "tags" => Node::TextList(vec![
                        "typography".to_string(),
                        "bengali".to_string(),
                    ]),
                },
            ]),
        }),
        "contact" => Node::Group(fields! {
            "heading" => Node::text("Say hello"),
            "details" => Node::Group(fields! {
                "email" => Node::text("hi@example.com"),
                "phone" => Node::text("+880 1700 000000"),
                "location" => Node::text("Dhaka, Bangladesh"),
            }),
        }),
        "gallery" => Node::Group(fields! {
            "heading" => Node::text("Gallery"),
            "images" => Node::ItemList(vec![
                fields! {
                    "src" => Node::text("https://placehold.co/600x400"),
                    "alt" => Node::text("Workspace"),
                },
            ]),
        }),
    }
}

fn bengali_sections() -> Fields {
    fields! {
        "hero" => Node::Group(fields! {
            "title" => Node::text("হ্যালো, আমি সুমন"),
            "subtitle" => Node::text("ফুল-স্ট্যাক ডেভেলপার ও ডিজাইনার"),
            "image" => Node::text("https://placehold.co/960x540"),
            "ctaText" => Node::text("যোগাযোগ করুন"),
        }),
        "about" => Node::Group(fields! {
            "bio" => Node::text(
                "ডাটাবেস থেকে শেষ পিক্সেল পর্যন্ত আমি দ্বিভাষিক ওয়েব অভিজ্ঞতা তৈরি করি, \
                 এবং দুই ভাষাতেই খুঁটিনাটির দিকে খেয়াল রাখি।",
            ),
            "mission" => Node::text(
                "কাউকে বঞ্চিত না করে ওয়েবকে বাংলাভাষীদের কাছে স্বাভাবিক করে তোলা।",
            ),
            "avatar" => Node::text("https://placehold.co/320x320"),
            "tags" => Node::TextList(vec![
                "ওয়েব".to_string(),
                "ডিজাইন".to_string(),
                "বাংলা".to_string(),
            ]),
        }),
        "experience" => Node::Group(fields! {
            "heading" => Node::text("যেখানে কাজ করেছি"),
            "jobs" => Node::ItemList(vec![
                fields! {
                    "role" => Node::text("সিনিয়র ইঞ্জিনিয়ার"),
                    "company" => Node::text("ঢাকা ডিজিটাল"),
                    "period" => Node::text("২০২১ - বর্তমান"),
                    "responsibilities" => Node::TextList(vec![
                        "স্টোরফ্রন্ট পুনর্নির্মাণের নেতৃত্ব".to_string(),
                        "চারজন ইঞ্জিনিয়ারকে মেন্টরিং".to_string(),
                    ]),
                },
                fields! {
                    "role" => Node::text("ওয়েব ডেভেলপার"),
                    "company" => Node::text("ফ্রিল্যান্স"),
                    "period" => Node::text("২০১৮ - ২০২১"),
                    "responsibilities" => Node::TextList(vec![
                        "ক্লায়েন্ট সাইট ডেলিভারি".to_string(),
                    ]),
                },
            ]),
        }),
        "services" => Node::Group(fields! {
            "heading" => Node::text("আমি যা করি"),
            "items" => Node::ItemList(vec![
                fields! {
                    "icon" => Node::text("web"),
                    "title" => Node::text("ওয়েব ডেভেলপমেন্ট"),
                    "description" => Node::text(
                        "আধুনিক টুলিংয়ে তৈরি দ্রুত ও অভিগম্য সাইট, বাস্তব ব্যবহারকারীর \
                         মেট্রিকে যাচাই করা।",
                    ),
                },
                fields! {
                    "icon" => Node::text("pen"),
                    "title" => Node::text("ব্র্যান্ড ডিজাইন"),
                    "description" => Node::text("বাস্তবের মুখোমুখি হয়েও টিকে থাকা পরিচয় ব্যবস্থা।"),
                },
            ]),
        }),
        "pricing" => Node::Group(fields! {
            "heading" => Node::text("প্যাকেজ"),
            "packages" => Node::ItemList(vec![
                fields! {
                    "name" => Node::text("স্টার্টার"),
                    "price" => Node::text("$৪৯৯"),
                    "features" => Node::TextList(vec![
                        "এক পাতার সাইট".to_string(),
                        "দুইবার সংশোধন".to_string(),
                    ]),
                    "popular" => Node::Flag(false),
                },
                fields! {
                    "name" => Node::text("স্টুডিও"),
                    "price" => Node::text("$১৯৯৯"),
                    "features" => Node::TextList(vec![
                        "সম্পূর্ণ সাইট".to_string(),
                        "দ্বিভাষিক কনটেন্ট".to_string(),
                        "তিন মাসের সাপোর্ট".to_string(),
                    ]),
                    "popular" => Node::Flag(true),
                },
            ]),
        }),
        "blog" => Node::Group(fields! {
            "heading" => Node::text("লেখালেখি"),
            "posts" => Node::ItemList(vec![
                fields! {
                    "title" => Node::text("ওয়েবে বাংলা টাইপসেটিং"),
                    "excerpt" => Node::text("কী ভাঙে, কী কাজ করে, আর কী শিপ করা উচিত।"),
                    "content" => Node::text(
                        "বাংলা টেক্সট রেন্ডারিং অনেক এগিয়েছে, তবু ডিফল্ট সেটিং এখনো নানা \
                         জায়গায় ব্যর্থ হয়। ফন্ট স্ট্যাক, লাইন-হাইট আর যুক্তাক্ষর নিয়ে আমার \
                         সিদ্ধান্তগুলো এই লেখায়।",
                    ),
                    "image" => Node::text("https://placehold.co/800x450"),
                    "tags" => Node::TextList(vec![
                        "টাইপোগ্রাফি".to_string(),
                        "বাংলা".to_string(),
                    ]),
                },
            ]),
        }),
        "contact" => Node::Group(fields! {
            "heading" => Node::text("কথা বলুন"),
            "details" => Node::Group(fields! {
                "email" => Node::text("hi@example.com"),
                "phone" => Node::text("+880 1700 000000"),
                "location" => Node::text("ঢাকা, বাংলাদেশ"),
            }),
        }),
        "gallery" => Node::Group(fields! {
            "heading" => Node::text("গ্যালারি"),
            "images" => Node::ItemList(vec![
                fields! {
                    "src" => Node::text("https://placehold.co/600x400"),
                    "alt" => Node::text("Workspace"),
                },
            ]),
        }),
    }
}

//! Starter documents offered when creating a diagram.

use serde::Serialize;

/// A named starter document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagramTemplate {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name, also used as the new file's name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Initial diagram source. Empty for the blank template.
    pub content: &'static str,
}

impl DiagramTemplate {
    /// Whether this is the empty starter.
    pub fn is_blank(&self) -> bool {
        self.id == BLANK_ID
    }
}

const BLANK_ID: &str = "blank";

/// Every built-in template, in display order.
pub static TEMPLATES: [DiagramTemplate; 5] = [
    DiagramTemplate {
        id: BLANK_ID,
        name: "Blank",
        description: "Start from scratch",
        content: "",
    },
    DiagramTemplate {
        id: "flowchart",
        name: "Flowchart",
        description: "Process flow with decisions",
        content: "flowchart TD
    A[Start] --> B{Is it working?}
    B -- Yes --> C[Great!]
    B -- No --> D[Debug]
    D --> B",
    },
    DiagramTemplate {
        id: "er-diagram",
        name: "ER Diagram",
        description: "Entity relationships",
        content: "erDiagram
    CUSTOMER ||--o{ ORDER : places
    ORDER ||--|{ LINE_ITEM : contains
    CUSTOMER {
        string name
        string email
    }
    ORDER {
        int id
        date created
        string status
    }
    LINE_ITEM {
        int quantity
        float price
    }",
    },
    DiagramTemplate {
        id: "sequence",
        name: "Sequence",
        description: "Message interactions",
        content: "sequenceDiagram
    participant Client
    participant Server
    participant Database

    Client->>Server: HTTP Request
    Server->>Database: Query
    Database-->>Server: Results
    Server-->>Client: JSON Response",
    },
    DiagramTemplate {
        id: "class-diagram",
        name: "Class Diagram",
        description: "Class inheritance",
        content: "classDiagram
    class Animal {
        +String name
        +int age
        +makeSound()
    }
    class Dog {
        +fetch()
    }
    class Cat {
        +purr()
    }
    Animal <|-- Dog
    Animal <|-- Cat",
    },
];

/// Look up a template by id.
pub fn find(id: &str) -> Option<&'static DiagramTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

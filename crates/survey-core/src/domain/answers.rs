use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A label that is not part of a question's closed answer set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not an allowed option")]
pub struct UnknownOption(pub String);

/// Declares a closed answer set.
///
/// Each option has a wire label (stored and sent as-is) and a display label.
macro_rules! choice {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, $label:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every option, in the order the form presents them.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The label stored and sent over the wire.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Text shown to the member next to the option.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(UnknownOption(other.to_string())),
                }
            }
        }
    };
}

choice! {
    /// When the member usually trains.
    TrainingSchedule {
        /// Morning.
        Morning => "manha", "Manhã";
        /// Afternoon.
        Afternoon => "tarde", "Tarde";
        /// Evening.
        Evening => "noite", "Noite";
        /// Changes from day to day.
        Varies => "varia-conforme-dia", "Varia conforme o dia";
    }
}

choice! {
    /// How experienced the member considers themselves.
    ExperienceLevel {
        /// Beginner.
        Beginner => "iniciante", "Iniciante";
        /// Intermediate.
        Intermediate => "intermediario", "Intermediário";
        /// Advanced.
        Advanced => "avancado", "Avançado";
    }
}

choice! {
    /// How long the member has trained at the gym.
    AcademyTime {
        /// Less than a month.
        UnderOneMonth => "menos-1-mes", "Menos de 1 mês";
        /// One to six months.
        OneToSixMonths => "1-6-meses", "1 à 6 meses";
        /// Six months to a year.
        SixMonthsToOneYear => "6-meses-1-ano", "6 meses à 1 ano";
        /// More than a year.
        OverOneYear => "mais-1-ano", "Mais de 1 ano";
    }
}

choice! {
    /// Rating of the front desk on arrival.
    ReceptionService {
        /// Excellent.
        Excellent => "excelente", "Excelente";
        /// Good.
        Good => "bom", "Bom";
        /// Fair.
        Fair => "regular", "Regular";
        /// Poor.
        Poor => "ruim", "Ruim";
    }
}

choice! {
    /// How attentively instructors follow the member's training.
    InstructorSupport {
        /// Always.
        Always => "sempre", "Sempre";
        /// Sometimes.
        Sometimes => "as-vezes", "Às vezes";
        /// Rarely.
        Rarely => "raramente", "Raramente";
        /// Never.
        Never => "nunca", "Nunca";
    }
}

choice! {
    /// Whether exercise guidance is given and tailored to the member.
    TrainingGuidance {
        /// Always, and personalised.
        Personalised => "sim-sempre", "Sim, sempre";
        /// Sometimes.
        Sometimes => "as-vezes", "Às vezes";
        /// Guidance is given but not personalised.
        NotPersonalised => "recebo-orientacao-nao-personalizada", "Recebo orientação, mas não é personalizada";
        /// No guidance at all.
        NoGuidance => "nao-recebo-orientacao", "Não recebo orientação";
    }
}

choice! {
    /// Whether equipment is in good condition and free during the member's hours.
    EquipmentAvailability {
        /// Always.
        Always => "sempre", "Sempre";
        /// Sometimes.
        Sometimes => "as-vezes", "Às vezes";
        /// Often busy or broken.
        OftenBusyOrBroken => "frequentemente-ocupados-defeito", "Frequentemente ocupados ou com defeito";
    }
}

choice! {
    /// Overall satisfaction with the gym.
    OverallSatisfaction {
        /// Very satisfied.
        VerySatisfied => "muito-satisfeito", "Muito satisfeito";
        /// Satisfied.
        Satisfied => "satisfeito", "Satisfeito";
        /// Indifferent.
        Indifferent => "indiferente", "Indiferente";
        /// Dissatisfied.
        Dissatisfied => "insatisfeito", "Insatisfeito";
    }
}

/// One of the eight required single-choice questions.
///
/// The answer sets are versioned together with the question wording: changing
/// either is a breaking change to stored data, not a configuration option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Question {
    /// "Horário de Treino".
    TrainingSchedule,
    /// "Nível de Experiência".
    ExperienceLevel,
    /// "Tempo de Academia".
    AcademyTime,
    /// "Recepção e Atendimento Inicial".
    ReceptionService,
    /// "Acompanhamento dos Instrutores".
    InstructorSupport,
    /// "Orientação e Personalização do Treino".
    TrainingGuidance,
    /// "Disponibilidade de Equipamentos".
    EquipmentAvailability,
    /// "Satisfação Geral".
    OverallSatisfaction,
}

impl Question {
    /// All questions in form order.
    pub const ALL: [Self; 8] = [
        Self::TrainingSchedule,
        Self::ExperienceLevel,
        Self::AcademyTime,
        Self::ReceptionService,
        Self::InstructorSupport,
        Self::TrainingGuidance,
        Self::EquipmentAvailability,
        Self::OverallSatisfaction,
    ];

    /// Field name used in JSON payloads.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::TrainingSchedule => "trainingSchedule",
            Self::ExperienceLevel => "experienceLevel",
            Self::AcademyTime => "academyTime",
            Self::ReceptionService => "receptionService",
            Self::InstructorSupport => "instructorSupport",
            Self::TrainingGuidance => "trainingGuidance",
            Self::EquipmentAvailability => "equipmentAvailability",
            Self::OverallSatisfaction => "overallSatisfaction",
        }
    }

    /// Column name in the relational stores.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::TrainingSchedule => "training_schedule",
            Self::ExperienceLevel => "experience_level",
            Self::AcademyTime => "academy_time",
            Self::ReceptionService => "reception_service",
            Self::InstructorSupport => "instructor_support",
            Self::TrainingGuidance => "training_guidance",
            Self::EquipmentAvailability => "equipment_availability",
            Self::OverallSatisfaction => "overall_satisfaction",
        }
    }

    /// Short section heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::TrainingSchedule => "Horário de Treino",
            Self::ExperienceLevel => "Nível de Experiência",
            Self::AcademyTime => "Tempo de Academia",
            Self::ReceptionService => "Recepção e Atendimento Inicial",
            Self::InstructorSupport => "Acompanhamento dos Instrutores",
            Self::TrainingGuidance => "Orientação e Personalização do Treino",
            Self::EquipmentAvailability => "Disponibilidade de Equipamentos",
            Self::OverallSatisfaction => "Satisfação Geral",
        }
    }

    /// The question as put to the member.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::TrainingSchedule => "Qual o horário que você costuma treinar?",
            Self::ExperienceLevel => "Você se considera:",
            Self::AcademyTime => "Há quanto tempo você treina na academia?",
            Self::ReceptionService => {
                "Como você avalia o atendimento da recepção ao entrar na academia?"
            }
            Self::InstructorSupport => {
                "Os instrutores acompanham seu treino de forma adequada e atenciosa?"
            }
            Self::TrainingGuidance => {
                "Você sente que recebe orientação adequada sobre os exercícios e que ela é \
                 personalizada de acordo com seus objetivos?"
            }
            Self::EquipmentAvailability => {
                "Os equipamentos estão em boas condições e disponíveis nos horários em que você \
                 treina?"
            }
            Self::OverallSatisfaction => "Qual o seu nível de satisfação geral com a academia?",
        }
    }

    /// `(wire label, display label)` for every allowed answer, in form order.
    #[must_use]
    pub fn options(self) -> Vec<(&'static str, &'static str)> {
        fn pairs<T: Copy>(
            all: &[T],
            wire: fn(T) -> &'static str,
            label: fn(T) -> &'static str,
        ) -> Vec<(&'static str, &'static str)> {
            all.iter().map(|&o| (wire(o), label(o))).collect()
        }

        match self {
            Self::TrainingSchedule => pairs(
                TrainingSchedule::ALL,
                TrainingSchedule::as_str,
                TrainingSchedule::label,
            ),
            Self::ExperienceLevel => pairs(
                ExperienceLevel::ALL,
                ExperienceLevel::as_str,
                ExperienceLevel::label,
            ),
            Self::AcademyTime => pairs(AcademyTime::ALL, AcademyTime::as_str, AcademyTime::label),
            Self::ReceptionService => pairs(
                ReceptionService::ALL,
                ReceptionService::as_str,
                ReceptionService::label,
            ),
            Self::InstructorSupport => pairs(
                InstructorSupport::ALL,
                InstructorSupport::as_str,
                InstructorSupport::label,
            ),
            Self::TrainingGuidance => pairs(
                TrainingGuidance::ALL,
                TrainingGuidance::as_str,
                TrainingGuidance::label,
            ),
            Self::EquipmentAvailability => pairs(
                EquipmentAvailability::ALL,
                EquipmentAvailability::as_str,
                EquipmentAvailability::label,
            ),
            Self::OverallSatisfaction => pairs(
                OverallSatisfaction::ALL,
                OverallSatisfaction::as_str,
                OverallSatisfaction::label,
            ),
        }
    }

    /// Whether `value` is one of this question's wire labels.
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        self.options().iter().any(|(wire, _)| *wire == value)
    }

    /// Looks a question up by its JSON field name.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| q.key() == key)
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(Question::TrainingSchedule, 4)]
    #[test_case(Question::ExperienceLevel, 3)]
    #[test_case(Question::AcademyTime, 4)]
    #[test_case(Question::ReceptionService, 4)]
    #[test_case(Question::InstructorSupport, 4)]
    #[test_case(Question::TrainingGuidance, 4)]
    #[test_case(Question::EquipmentAvailability, 3)]
    #[test_case(Question::OverallSatisfaction, 4)]
    fn each_question_has_its_closed_set(question: Question, expected: usize) {
        assert_eq!(question.options().len(), expected);
    }

    #[test]
    fn wire_labels_parse_back() {
        for &option in TrainingGuidance::ALL {
            assert_eq!(option.as_str().parse::<TrainingGuidance>(), Ok(option));
        }
        assert_eq!(
            "manhã".parse::<TrainingSchedule>(),
            Err(UnknownOption("manhã".to_string()))
        );
    }

    #[test]
    fn serde_uses_wire_labels() {
        let json = serde_json::to_string(&AcademyTime::OneToSixMonths).unwrap();
        assert_eq!(json, "\"1-6-meses\"");
        let parsed: EquipmentAvailability =
            serde_json::from_str("\"frequentemente-ocupados-defeito\"").unwrap();
        assert_eq!(parsed, EquipmentAvailability::OftenBusyOrBroken);
    }

    #[test]
    fn labels_are_shared_across_questions_but_checked_per_question() {
        assert!(Question::InstructorSupport.accepts("sempre"));
        assert!(Question::EquipmentAvailability.accepts("sempre"));
        assert!(!Question::TrainingGuidance.accepts("sempre"));
    }

    #[test]
    fn keys_round_trip() {
        for question in Question::ALL {
            assert_eq!(Question::from_key(question.key()), Some(question));
        }
        assert_eq!(Question::from_key("name"), None);
    }
}

//! Character domain: launching melee attacks and collecting their hits.

use super::controller::{CharacterController, Frame};
use super::state::CharacterState;
use crate::combat::{AttackPosture, resolve_melee_hits};

impl CharacterController {
    pub(crate) fn handle_melee_attack(&mut self, f: &mut Frame) {
        let state = self.state();
        if !self.config.melee.enabled
            || !matches!(state, CharacterState::Standard | CharacterState::Crouch)
            || self.fsm.is_transition_pending()
        {
            return;
        }

        let posture = if state == CharacterState::Crouch {
            AttackPosture::Crouched
        } else if self.runtime.on_ground {
            AttackPosture::Standing
        } else {
            AttackPosture::InAir
        };

        let launched = self
            .attacks
            .iter()
            .enumerate()
            .filter(|(_, attack)| attack.is_latched())
            .find(|(_, attack)| !attack.animation(posture).is_empty())
            .map(|(index, attack)| (index, attack.animation(posture).to_string()));

        if let Some((index, animation)) = launched {
            // one press, one attack
            self.attacks[index].clear_latch();
            self.runtime.current_attack = Some(index);
            self.runtime.attack_animation = animation;
            self.runtime.attack_crouched = posture == AttackPosture::Crouched;
            self.request(CharacterState::MeleeAttack);
        }
    }

    pub(crate) fn resolve_attack_hits(&mut self, f: &mut Frame) {
        let Some(index) = self.runtime.current_attack else {
            return;
        };
        let Some(attack) = self.attacks.get_mut(index) else {
            return;
        };

        let hits = resolve_melee_hits(
            f.world,
            index,
            attack,
            f.motor.position,
            f.motor.facing(),
            f.motor.mask(),
        );
        f.out.hits.extend(hits);
    }
}
